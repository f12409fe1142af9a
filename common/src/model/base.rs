use serde::{Deserialize, Serialize};

/// One of the two backend datasets a lookup can target.
///
/// The selection is persisted across sessions (key `sb_base`) and sent as
/// the `base` query parameter on every history and search request. Switching
/// it invalidates both history collections entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseName {
    Homecenter,
    Mercado,
}

impl BaseName {
    /// Wire value used in URLs and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseName::Homecenter => "homecenter",
            BaseName::Mercado => "mercado",
        }
    }

    /// Human label shown on the segmented toggle.
    pub fn label(&self) -> &'static str {
        match self {
            BaseName::Homecenter => "Homecenter",
            BaseName::Mercado => "Mercado",
        }
    }

    /// Parses a stored value; anything unrecognized falls back to the
    /// default base rather than failing, so a corrupt storage entry never
    /// blocks startup.
    pub fn parse(value: &str) -> BaseName {
        match value {
            "mercado" => BaseName::Mercado,
            _ => BaseName::Homecenter,
        }
    }
}

impl Default for BaseName {
    fn default() -> Self {
        BaseName::Homecenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_values() {
        assert_eq!(BaseName::parse("homecenter"), BaseName::Homecenter);
        assert_eq!(BaseName::parse("mercado"), BaseName::Mercado);
        assert_eq!(BaseName::parse(BaseName::Mercado.as_str()), BaseName::Mercado);
    }

    #[test]
    fn parse_falls_back_to_default_on_garbage() {
        assert_eq!(BaseName::parse(""), BaseName::Homecenter);
        assert_eq!(BaseName::parse("sqlite"), BaseName::Homecenter);
    }
}
