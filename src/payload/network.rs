use serde_json::Value;

use super::walk::{entries, mapping, string_list};

/// Relationship payload behind the network graph:
/// `campaign -> user -> hatekeywords`, plus the reverse `hatewords` index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkPayload {
    pub campaigns: Vec<CampaignUsers>,
    pub hate_words: Vec<HateWordUsage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignUsers {
    pub name: String,
    pub users: Vec<UserKeywords>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserKeywords {
    pub name: String,
    pub hate_keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HateWordUsage {
    pub keyword: String,
    pub users: Vec<KeywordUser>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordUser {
    pub name: String,
    pub campaigns: Vec<String>,
}

impl NetworkPayload {
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = mapping(value, "network graph") else {
            return Self::default();
        };

        let campaigns = root
            .get("campaign")
            .map(|campaigns| {
                entries(campaigns, "campaign")
                    .map(|(campaign_name, users)| CampaignUsers {
                        name: campaign_name.clone(),
                        users: entries(users, campaign_name)
                            .map(|(user_name, details)| UserKeywords {
                                name: user_name.clone(),
                                hate_keywords: string_list(
                                    mapping(details, user_name)
                                        .and_then(|details| details.get("hatekeywords")),
                                    user_name,
                                ),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let hate_words = root
            .get("hatewords")
            .map(|words| {
                entries(words, "hatewords")
                    .map(|(keyword, users)| HateWordUsage {
                        keyword: keyword.clone(),
                        users: entries(users, keyword)
                            .map(|(user_name, details)| KeywordUser {
                                name: user_name.clone(),
                                campaigns: string_list(
                                    mapping(details, user_name)
                                        .and_then(|details| details.get("campaigns")),
                                    user_name,
                                ),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            campaigns,
            hate_words,
        }
    }

    pub fn hate_word(&self, keyword: &str) -> Option<&HateWordUsage> {
        self.hate_words.iter().find(|usage| usage.keyword == keyword)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}
