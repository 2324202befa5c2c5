//! State-wide pharmacy roll-up.
//!
//! A chain is treated as one clinic per state; every city with at least
//! one store offering appointments counts as one "appointment".

use crate::domain::{
    pack_items, section_block, Clinic, ClinicClass, NotificationText, LINK_WEIGHT,
};

/// Message length limit of the strictest text channel.
pub const MESSAGE_LIMIT: usize = 280;

/// `" appointments available in "`
const LEAD_LEN: usize = 27;
/// `". Check eligibility and sign up at "`
const TAIL_LEN: usize = 35;

/// A pharmacy chain's availability across one state.
#[derive(Debug, Clone)]
pub struct PharmacyRollup {
    brand: String,
    state: String,
    cities: Vec<String>,
    link: String,
}

impl PharmacyRollup {
    #[must_use]
    pub fn new(
        brand: impl Into<String>,
        state: impl Into<String>,
        cities: Vec<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            state: state.into(),
            cities,
            link: link.into(),
        }
    }

    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Characters left for the city list in one message.
    #[must_use]
    pub fn city_budget(&self) -> usize {
        MESSAGE_LIMIT.saturating_sub(self.brand.chars().count() + LEAD_LEN + TAIL_LEN + LINK_WEIGHT)
    }
}

impl Clinic for PharmacyRollup {
    fn title(&self) -> String {
        format!("{} stores in {}", self.brand, self.state)
    }

    fn appointments(&self) -> u32 {
        u32::try_from(self.cities.len()).unwrap_or(u32::MAX)
    }

    fn link(&self) -> Option<String> {
        Some(self.link.clone())
    }

    fn storage_key(&self) -> String {
        format!("{}-{}", self.brand, self.state)
    }

    fn class(&self) -> ClinicClass {
        ClinicClass::Pharmacy
    }

    fn notification_text(&self) -> NotificationText {
        let messages = pack_items(&self.cities, self.city_budget())
            .into_iter()
            .map(|cities| {
                format!(
                    "{} appointments available in {cities}. Check eligibility and sign up at {}",
                    self.brand, self.link
                )
            })
            .collect();
        NotificationText::Split(messages)
    }

    fn chat_block(&self, _new_appointments: i64) -> serde_json::Value {
        section_block(format!(
            "*{}*\n*Available appointments in {}*\n*Link:* {}",
            self.title(),
            self.cities.join(", "),
            self.link
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_UP_PAGE: &str = "https://www.cvs.com/immunizations/covid-19-vaccine";

    fn rollup(cities: &[&str]) -> PharmacyRollup {
        PharmacyRollup::new(
            "CVS",
            "MA",
            cities.iter().map(|c| (*c).to_string()).collect(),
            SIGN_UP_PAGE,
        )
    }

    #[test]
    fn counts_cities_as_appointments() {
        let clinic = rollup(&["BOSTON", "LYNN"]);
        assert_eq!(clinic.appointments(), 2);
        assert_eq!(clinic.title(), "CVS stores in MA");
        assert_eq!(clinic.storage_key(), "CVS-MA");
        assert_eq!(clinic.class(), ClinicClass::Pharmacy);
    }

    #[test]
    fn budget_for_cvs_is_192() {
        assert_eq!(rollup(&[]).city_budget(), 192);
    }

    #[test]
    fn one_city_is_one_message() {
        assert_eq!(
            rollup(&["SOMERVILLE"]).notification_text().into_messages(),
            vec![format!(
                "CVS appointments available in SOMERVILLE. Check eligibility and sign up at {SIGN_UP_PAGE}"
            )]
        );
    }

    #[test]
    fn long_city_lists_split() {
        let clinic = rollup(&[
            "AMHERST", "BOSTON", "BROCKTON", "CAMBRIDGE", "CARVER", "CHICOPEE", "DANVERS",
            "DORCHESTER", "FALL RIVER", "FALMOUTH", "FITCHBURG", "HAVERHILL", "LEOMINSTER",
            "LUNENBURG", "LYNN", "MATTAPAN", "METHUEN", "SOMERVILLE", "SPRINGFIELD", "WOBURN",
            "WORCESTER",
        ]);
        assert_eq!(
            clinic.notification_text().into_messages(),
            vec![
                format!("CVS appointments available in AMHERST, BOSTON, BROCKTON, CAMBRIDGE, CARVER, CHICOPEE, DANVERS, DORCHESTER, FALL RIVER, FALMOUTH, FITCHBURG, HAVERHILL, LEOMINSTER, LUNENBURG, LYNN, MATTAPAN, METHUEN, SOMERVILLE, SPRINGFIELD. Check eligibility and sign up at {SIGN_UP_PAGE}"),
                format!("CVS appointments available in WOBURN, WORCESTER. Check eligibility and sign up at {SIGN_UP_PAGE}"),
            ]
        );
    }

    #[test]
    fn chat_block_lists_cities() {
        let block = rollup(&["BOSTON", "LYNN"]).chat_block(2);
        assert_eq!(
            block["text"]["text"],
            format!("*CVS stores in MA*\n*Available appointments in BOSTON, LYNN*\n*Link:* {SIGN_UP_PAGE}")
        );
    }

    #[test]
    fn no_cities_means_no_messages() {
        assert!(rollup(&[]).notification_text().into_messages().is_empty());
    }
}
