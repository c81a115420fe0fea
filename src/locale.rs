//! User-facing strings that change with the prospecting locale.
//!
//! Validation sentinels, enrichment fallbacks and CSV headers all come from here so
//! an export never mixes languages.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// Written to `cleanEmail` when no usable address was found.
    pub fn email_sentinel(&self) -> &'static str {
        match self {
            Locale::Fr => "À prospecter",
            Locale::En => "To be prospected",
        }
    }

    /// Written to `cleanWebsite` when the site is absent or not a valid URL.
    pub fn website_sentinel(&self) -> &'static str {
        match self {
            Locale::Fr => "Non valide",
            Locale::En => "Invalid",
        }
    }

    pub fn pitch_fallback(&self) -> &'static str {
        match self {
            Locale::Fr => "Audit en cours. Contacter pour analyse manuelle.",
            Locale::En => "Audit in progress. Contact for a manual review.",
        }
    }

    pub fn analysis_failed_weakness(&self) -> &'static str {
        match self {
            Locale::Fr => "Erreur d'analyse",
            Locale::En => "Analysis unavailable",
        }
    }

    pub fn analysis_failed_pitch(&self) -> &'static str {
        match self {
            Locale::Fr => {
                "Impossible d'analyser ce prospect pour le moment. Une vérification manuelle est recommandée."
            }
            Locale::En => {
                "This prospect cannot be analysed right now. A manual review is recommended."
            }
        }
    }

    pub fn no_leads_message(&self) -> &'static str {
        match self {
            Locale::Fr => "Aucun prospect trouvé dans cette zone. Essayez une ville plus grande ou un autre mot-clé.",
            Locale::En => "No leads found in this area. Try a larger city or a different keyword.",
        }
    }

    pub fn export_failed_message(&self) -> &'static str {
        match self {
            Locale::Fr => "Erreur lors de la génération du fichier CSV.",
            Locale::En => "Failed to generate the CSV file.",
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Locale::Fr, true) => "Oui",
            (Locale::Fr, false) => "Non",
            (Locale::En, true) => "Yes",
            (Locale::En, false) => "No",
        }
    }

    pub fn csv_headers(&self) -> [&'static str; 8] {
        match self {
            Locale::Fr => [
                "Nom de l'entreprise",
                "Adresse",
                "Site Web (Validé)",
                "Email (Validé)",
                "Téléphone (Nettoyé)",
                "Mobile Friendly",
                "Point Faible",
                "Pitch Commercial",
            ],
            Locale::En => [
                "Company Name",
                "Address",
                "Website (Validated)",
                "Email (Validated)",
                "Phone (Cleaned)",
                "Mobile Friendly",
                "Weakness",
                "Sales Pitch",
            ],
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Locale::Fr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => anyhow::bail!("PROSPECT_LOCALE must be 'fr' or 'en', got '{}'", other),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Fr => write!(f, "fr"),
            Locale::En => write!(f, "en"),
        }
    }
}
