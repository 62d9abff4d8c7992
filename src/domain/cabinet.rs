// Cabinet (dental practice) domain model
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Cabinet {
    pub id: String,
    pub name: String,
}

impl Cabinet {
    pub fn new(id: String) -> Self {
        let name = Self::format_name(&id);
        Self { id, name }
    }

    fn format_name(id: &str) -> String {
        // Convert "Cabinet_Du_Parc_" to "Cabinet Du Parc"
        id.trim_end_matches('_').replace('_', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        let cabinet = Cabinet::new("Cabinet_Du_Parc_".to_string());
        assert_eq!(cabinet.name, "Cabinet Du Parc");

        let cabinet = Cabinet::new("Sourire_13".to_string());
        assert_eq!(cabinet.name, "Sourire 13");
    }
}
