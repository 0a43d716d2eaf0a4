use serde::Deserialize;
use serde_json::Value;

use super::walk::{entries, mapping, string_list};

/// Classification tag attached to a local campaign. Only drives colouring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum CampaignLabel {
    #[serde(rename = "anti-india")]
    AntiIndia,
    #[serde(rename = "not-anti")]
    NotAnti,
    #[default]
    #[serde(rename = "none")]
    Unlabelled,
}

impl CampaignLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AntiIndia => "anti-india",
            Self::NotAnti => "not-anti",
            Self::Unlabelled => "none",
        }
    }
}

/// Campaign payload: `global -> local -> { label, tdescription }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CampaignCatalog {
    pub globals: Vec<GlobalCampaign>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalCampaign {
    pub name: String,
    pub locals: Vec<LocalCampaign>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalCampaign {
    pub name: String,
    pub label: CampaignLabel,
    pub descriptions: Vec<String>,
}

impl CampaignCatalog {
    pub fn from_value(value: &Value) -> Self {
        let globals = entries(value, "campaigns")
            .map(|(global_name, locals)| GlobalCampaign {
                name: global_name.clone(),
                locals: entries(locals, global_name)
                    .map(|(local_name, details)| {
                        let details = mapping(details, local_name);
                        LocalCampaign {
                            name: local_name.clone(),
                            label: details
                                .and_then(|details| details.get("label"))
                                .and_then(|label| CampaignLabel::deserialize(label).ok())
                                .unwrap_or_default(),
                            descriptions: string_list(
                                details.and_then(|details| details.get("tdescription")),
                                local_name,
                            ),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { globals }
    }

    pub fn global(&self, name: &str) -> Option<&GlobalCampaign> {
        self.globals.iter().find(|global| global.name == name)
    }
}

impl GlobalCampaign {
    pub fn local(&self, name: &str) -> Option<&LocalCampaign> {
        self.locals.iter().find(|local| local.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_globals_and_locals() {
        let catalog = CampaignCatalog::from_value(&json!({
            "boycott_campaign": {
                "local_one": { "label": "anti-india", "tdescription": ["t1", "t2"] },
                "local_two": { "label": "not-anti", "tdescription": [] }
            },
            "second_global": {}
        }));

        assert_eq!(catalog.globals.len(), 2);
        let first = catalog.global("boycott_campaign").expect("global present");
        assert_eq!(first.locals[0].label, CampaignLabel::AntiIndia);
        assert_eq!(first.locals[0].descriptions, ["t1", "t2"]);
        assert_eq!(first.local("local_two").map(|local| local.label), Some(CampaignLabel::NotAnti));
        assert!(catalog.global("second_global").is_some_and(|global| global.locals.is_empty()));
    }

    #[test]
    fn unknown_labels_fall_back_to_unlabelled() {
        let catalog = CampaignCatalog::from_value(&json!({
            "g": { "l": { "label": "mystery" }, "m": "garbage" }
        }));

        let global = &catalog.globals[0];
        assert_eq!(global.locals[0].label, CampaignLabel::Unlabelled);
        assert!(global.locals[0].descriptions.is_empty());
        assert_eq!(global.locals[1].label, CampaignLabel::Unlabelled);
    }

    #[test]
    fn label_round_trips_through_wire_names() {
        for label in [
            CampaignLabel::AntiIndia,
            CampaignLabel::NotAnti,
            CampaignLabel::Unlabelled,
        ] {
            let decoded: CampaignLabel =
                serde_json::from_value(json!(label.as_str())).expect("label decodes");
            assert_eq!(decoded, label);
        }
    }
}
