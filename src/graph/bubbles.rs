use crate::payload::{CampaignCatalog, CampaignLabel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BubbleKind {
    Global,
    Local,
}

/// Which slice of the campaign catalog the bubble chart shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BubbleView {
    #[default]
    Global,
    Local {
        global: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BubbleDatum {
    pub id: String,
    pub value: usize,
    pub kind: BubbleKind,
    pub label: CampaignLabel,
}

/// Global view: one bubble per global campaign sized by its local count.
/// Local view: one bubble per local campaign sized by its tweet count.
pub fn build_bubbles(catalog: &CampaignCatalog, view: &BubbleView) -> Vec<BubbleDatum> {
    match view {
        BubbleView::Global => catalog
            .globals
            .iter()
            .map(|global| BubbleDatum {
                id: global.name.clone(),
                value: global.locals.len(),
                kind: BubbleKind::Global,
                label: CampaignLabel::Unlabelled,
            })
            .collect(),
        BubbleView::Local { global } => catalog
            .global(global)
            .map(|global| {
                global
                    .locals
                    .iter()
                    .map(|local| BubbleDatum {
                        id: local.name.clone(),
                        value: local.descriptions.len(),
                        kind: BubbleKind::Local,
                        label: local.label,
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> CampaignCatalog {
        CampaignCatalog::from_value(&json!({
            "global_one": {
                "l1": { "label": "anti-india", "tdescription": ["a", "b", "c"] },
                "l2": { "label": "not-anti", "tdescription": ["d"] }
            },
            "global_two": {
                "l3": { "label": "anti-india", "tdescription": [] }
            }
        }))
    }

    #[test]
    fn global_view_counts_locals() {
        let bubbles = build_bubbles(&catalog(), &BubbleView::Global);
        let summary = bubbles
            .iter()
            .map(|bubble| (bubble.id.as_str(), bubble.value, bubble.kind, bubble.label))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                ("global_one", 2, BubbleKind::Global, CampaignLabel::Unlabelled),
                ("global_two", 1, BubbleKind::Global, CampaignLabel::Unlabelled),
            ]
        );
    }

    #[test]
    fn local_view_counts_descriptions() {
        let view = BubbleView::Local {
            global: "global_one".to_owned(),
        };
        let bubbles = build_bubbles(&catalog(), &view);
        assert_eq!(bubbles.len(), 2);
        assert_eq!(bubbles[0].value, 3);
        assert_eq!(bubbles[0].label, CampaignLabel::AntiIndia);
        assert_eq!(bubbles[1].value, 1);
        assert!(bubbles.iter().all(|bubble| bubble.kind == BubbleKind::Local));
    }

    #[test]
    fn unknown_global_yields_nothing() {
        let view = BubbleView::Local {
            global: "missing".to_owned(),
        };
        assert!(build_bubbles(&catalog(), &view).is_empty());
        assert!(build_bubbles(&CampaignCatalog::default(), &BubbleView::Global).is_empty());
    }
}
