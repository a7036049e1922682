use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const MODE_INNIE: &str = "innie";
pub const MODE_OUTIE: &str = "outie";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    #[serde(default)]
    pub is_severed: bool,
    /// Nominally `innie` or `outie`; stored as given.
    #[serde(default = "default_mode")]
    pub mode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn default_mode() -> String {
    MODE_OUTIE.to_string()
}

/// `outie` becomes `innie`; anything else, including unexpected values, becomes `outie`.
pub fn toggled_mode(current: &str) -> &'static str {
    if current == MODE_OUTIE {
        MODE_INNIE
    } else {
        MODE_OUTIE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_modes() {
        assert_eq!(toggled_mode("outie"), "innie");
        assert_eq!(toggled_mode("innie"), "outie");
        assert_eq!(toggled_mode(toggled_mode("outie")), "outie");
    }

    #[test]
    fn toggle_resets_unknown_modes_to_outie() {
        assert_eq!(toggled_mode("both"), "outie");
        assert_eq!(toggled_mode(""), "outie");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let model: Model = serde_json::from_str(
            r#"{"id": 7, "first_name": "Helly", "last_name": "R", "department": "Macrodata Refinement"}"#,
        )
        .unwrap();
        assert!(!model.is_severed);
        assert_eq!(model.mode, "outie");
    }
}
