//! The demo entity model registered at startup.
//!
//! A small geography data set: menu-visible countries and airlines, with
//! leaders and cities reachable only as nested data.

use chrono::NaiveDate;
use datagate_core::{
    ChildLink, Entity, EntitySchema, Error, FieldDef, TypeCatalog,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// A country, listed in the site menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    /// Environmental Performance Index, 0-100.
    pub epi_index: f64,
    pub flag_url: Option<String>,
    pub leader_id: Option<Uuid>,
    pub leader: Option<Leader>,
    pub capitol_id: Option<Uuid>,
    pub capitol: Option<City>,
    pub cities: Option<Vec<City>>,
}

impl Entity for Country {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// A country's head of government. Reached through `Country.leader`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Leader {
    pub id: Uuid,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub time_in_office_years: Option<i64>,
}

impl Entity for Leader {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// A city. Reached through `Country.capitol` or `Country.cities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub population: Option<i64>,
    pub transit: Option<String>,
}

impl Entity for City {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// An airline, listed in the site menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Airline {
    pub id: Uuid,
    pub name: String,
    pub international: bool,
}

impl Entity for Airline {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// Register the demo model and seal the catalog.
pub fn build_catalog() -> Result<TypeCatalog, Error> {
    TypeCatalog::builder()
        .register::<Country>(
            EntitySchema::of::<Country>()
                .menu("Geography", "public")
                .searchable_by("name")
                .sorted_by("name")
                .with_field(FieldDef::text("name").required().with_validator("string"))
                .with_field(
                    FieldDef::number("epiIndex")
                        .with_step(0.01)
                        .with_help("Environmental Performance Index, 0-100."),
                )
                .with_field(
                    FieldDef::text("flagUrl")
                        .hide_in_table()
                        .with_default(json!("/images/flags/unknown.svg")),
                )
                .with_field(FieldDef::reference("leader", "Leader"))
                .with_field(FieldDef::text("leaderId").hidden())
                .with_field(FieldDef::reference("capitol", "City"))
                .with_field(FieldDef::text("capitolId").hidden())
                .with_field(FieldDef::collection("cities", "City"))
                .with_child_link(ChildLink::new("leader", "leaderId", "Leader"))
                .with_child_link(ChildLink::new("capitol", "capitolId", "City")),
        )?
        .register::<Leader>(
            EntitySchema::of::<Leader>()
                .child("Geography")
                .with_field(FieldDef::text("name").required().with_validator("string"))
                .with_field(FieldDef::date("birthdate"))
                .with_field(
                    FieldDef::number("timeInOfficeYears")
                        .with_step(1.0)
                        .with_suffix("years"),
                ),
        )?
        .register::<City>(
            EntitySchema::of::<City>()
                .child("Geography")
                .with_field(FieldDef::text("name").required().with_validator("string"))
                .with_field(FieldDef::number("population").with_step(1.0))
                .with_field(
                    FieldDef::text("transit")
                        .with_rows(3)
                        .with_help("Mass transit systems serving the city."),
                ),
        )?
        .register::<Airline>(
            EntitySchema::of::<Airline>()
                .menu("Transportation", "airplanemode_active")
                .with_field(FieldDef::text("name").required().with_validator("string"))
                .with_field(FieldDef::boolean("international")),
        )?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_registers_and_seals() {
        let catalog = build_catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.resolve("Country").is_some());
        assert!(catalog.resolve("Leader").is_some());
    }

    #[test]
    fn test_menu_split() {
        let catalog = build_catalog().unwrap();
        let menu = catalog.menu_types();
        assert!(menu.contains_key("Country"));
        assert!(menu.contains_key("Airline"));
        assert!(!menu.contains_key("Leader"));

        let children = catalog.child_types();
        assert!(children.contains_key("Leader"));
        assert!(children.contains_key("City"));
    }
}
