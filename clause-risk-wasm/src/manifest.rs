//! Rule metadata for the browser UI.

use clause_risk::{RuleId, RuleWeights};
use serde::{Deserialize, Serialize};

/// Display metadata for one rule.
pub struct RuleManifest {
    pub id: RuleId,
    pub color: &'static str, // CSS hex color
}

/// Every rule with its highlight color, in default-table order.
pub static RULE_MANIFESTS: &[RuleManifest] = &[
    RuleManifest {
        id: RuleId::LiabilityDisclaimed,
        color: "#d7263d",
    },
    RuleManifest {
        id: RuleId::UnlimitedLiability,
        color: "#f46036",
    },
    RuleManifest {
        id: RuleId::UnilateralIndemnity,
        color: "#ff6b6b",
    },
    RuleManifest {
        id: RuleId::LiabilityCapMissing,
        color: "#f38181",
    },
    RuleManifest {
        id: RuleId::PaymentTermsGt45d,
        color: "#ffd166",
    },
    RuleManifest {
        id: RuleId::NoLateFee,
        color: "#ffd3b6",
    },
    RuleManifest {
        id: RuleId::UnilateralTermination,
        color: "#aa96da",
    },
    RuleManifest {
        id: RuleId::ShortNotice,
        color: "#fcbad3",
    },
    RuleManifest {
        id: RuleId::NonIndianLaw,
        color: "#45b7d1",
    },
    RuleManifest {
        id: RuleId::ForeignForum,
        color: "#a8d8ea",
    },
    RuleManifest {
        id: RuleId::ConfidentialityPerpetual,
        color: "#4ecdc4",
    },
];

/// Serializable projection of a [`RuleManifest`] with its effective weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub id: RuleId,
    pub description: String,
    pub color: String,
    pub severe: bool,
    pub weight: i64,
}

pub fn rule_infos(weights: &RuleWeights) -> Vec<RuleInfo> {
    RULE_MANIFESTS
        .iter()
        .map(|manifest| RuleInfo {
            id: manifest.id,
            description: manifest.id.description().to_string(),
            color: manifest.color.to_string(),
            severe: manifest.id.is_severe(),
            weight: weights.get(manifest.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_covers_every_rule_in_order() {
        let ids: Vec<RuleId> = RULE_MANIFESTS.iter().map(|manifest| manifest.id).collect();
        assert_eq!(ids, RuleId::ALL.to_vec());
    }

    #[test]
    fn info_serialization() {
        let infos = rule_infos(&RuleWeights::default().with_weight(RuleId::NoLateFee, 0));
        let late_fee = infos.iter().find(|info| info.id == RuleId::NoLateFee).unwrap();
        assert_eq!(late_fee.weight, 0);
        assert!(!late_fee.severe);

        let value = serde_json::to_value(&infos[0]).unwrap();
        assert_eq!(value["id"], "liability_disclaimed");
        assert_eq!(value["severe"], true);
        assert_eq!(value["weight"], 10);
        assert_eq!(value["color"], "#d7263d");
    }
}
