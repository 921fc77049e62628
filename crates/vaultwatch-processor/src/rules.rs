//! Event name → formatting rule.
//!
//! The table is plain data: each canonical (lower-case) event name maps to
//! one [`Rule`]. Names missing from the table get the generic fallback
//! message.

use std::collections::HashMap;

use vaultwatch_core::Event;

/// One named positional argument of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Rendered as `name: value` from the flat string form.
    Scalar(&'static str),
    /// Array argument, rendered one element per line from the native value.
    List(&'static str),
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(n) | Self::List(n) => *n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Routine event, never announced.
    Suppressed,
    /// Announced only when the argument at `amount_index` reaches the
    /// configured minimum.
    ThresholdGated {
        amount_index: usize,
        fields: Vec<Field>,
    },
    /// Always announced.
    Unconditional { fields: Vec<Field> },
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` under `name` (case-insensitive).
    pub fn insert(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.insert(name.to_ascii_lowercase(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(&name.to_ascii_lowercase())
    }

    pub fn rule_for(&self, event: &Event) -> Option<&Rule> {
        self.rules.get(&event.canonical_name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for a MetaMorpho vault.
    pub fn metamorpho() -> Self {
        use Field::{List, Scalar};

        let mut t = Self::new();

        for name in [
            "AccrueInterest",
            "Transfer",
            "Approval",
            "UpdateLastTotalAssets",
            "EIP712DomainChanged",
        ] {
            t.insert(name, Rule::Suppressed);
        }

        t.insert(
            "Deposit",
            Rule::ThresholdGated {
                amount_index: 2,
                fields: vec![Scalar("sender"), Scalar("owner"), Scalar("assets"), Scalar("shares")],
            },
        );
        t.insert(
            "Withdraw",
            Rule::ThresholdGated {
                amount_index: 3,
                fields: vec![
                    Scalar("sender"),
                    Scalar("receiver"),
                    Scalar("owner"),
                    Scalar("assets"),
                    Scalar("shares"),
                ],
            },
        );
        t.insert(
            "ReallocateSupply",
            Rule::ThresholdGated {
                amount_index: 2,
                fields: vec![
                    Scalar("caller"),
                    Scalar("id"),
                    Scalar("suppliedAssets"),
                    Scalar("suppliedShares"),
                ],
            },
        );
        t.insert(
            "ReallocateWithdraw",
            Rule::ThresholdGated {
                amount_index: 2,
                fields: vec![
                    Scalar("caller"),
                    Scalar("id"),
                    Scalar("withdrawnAssets"),
                    Scalar("withdrawnShares"),
                ],
            },
        );

        let unconditional: Vec<(&str, Vec<Field>)> = vec![
            ("SubmitTimelock", vec![Scalar("newTimelock")]),
            ("SetTimelock", vec![Scalar("caller"), Scalar("newTimelock")]),
            ("SetSkimRecipient", vec![Scalar("newSkimRecipient")]),
            ("SetFee", vec![Scalar("caller"), Scalar("newFee")]),
            ("SetFeeRecipient", vec![Scalar("newFeeRecipient")]),
            ("SubmitGuardian", vec![Scalar("newGuardian")]),
            ("SetGuardian", vec![Scalar("caller"), Scalar("guardian")]),
            ("SubmitCap", vec![Scalar("caller"), Scalar("id"), Scalar("cap")]),
            ("SetCap", vec![Scalar("caller"), Scalar("id"), Scalar("cap")]),
            ("SubmitMarketRemoval", vec![Scalar("caller"), Scalar("id")]),
            ("SetCurator", vec![Scalar("newCurator")]),
            ("SetIsAllocator", vec![Scalar("allocator"), Scalar("isAllocator")]),
            ("RevokePendingTimelock", vec![Scalar("caller")]),
            ("RevokePendingCap", vec![Scalar("caller"), Scalar("id")]),
            ("RevokePendingGuardian", vec![Scalar("caller")]),
            ("RevokePendingMarketRemoval", vec![Scalar("caller"), Scalar("id")]),
            ("SetSupplyQueue", vec![Scalar("caller"), List("newSupplyQueue")]),
            ("SetWithdrawQueue", vec![Scalar("caller"), List("newWithdrawQueue")]),
            ("Skim", vec![Scalar("caller"), Scalar("token"), Scalar("amount")]),
            ("OwnershipTransferStarted", vec![Scalar("previousOwner"), Scalar("newOwner")]),
            ("OwnershipTransferred", vec![Scalar("previousOwner"), Scalar("newOwner")]),
        ];
        for (name, fields) in unconditional {
            t.insert(name, Rule::Unconditional { fields });
        }

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let t = RuleTable::metamorpho();
        assert_eq!(t.get("accrueinterest"), Some(&Rule::Suppressed));
        assert_eq!(t.get("ACCRUEINTEREST"), Some(&Rule::Suppressed));
        assert!(t.get("SomethingElse").is_none());
    }

    #[test]
    fn amount_positions() {
        let t = RuleTable::metamorpho();
        for (name, idx) in [
            ("deposit", 2),
            ("withdraw", 3),
            ("reallocatesupply", 2),
            ("reallocatewithdraw", 2),
        ] {
            match t.get(name) {
                Some(Rule::ThresholdGated { amount_index, fields }) => {
                    assert_eq!(*amount_index, idx, "{name}");
                    assert!(idx < fields.len(), "{name}");
                }
                other => panic!("{name}: {other:?}"),
            }
        }
    }

    #[test]
    fn queue_changes_render_as_lists() {
        let t = RuleTable::metamorpho();
        let Some(Rule::Unconditional { fields }) = t.get("SetWithdrawQueue") else {
            panic!("expected unconditional rule");
        };
        assert_eq!(fields[1], Field::List("newWithdrawQueue"));
        assert_eq!(fields[1].name(), "newWithdrawQueue");
    }

    #[test]
    fn custom_table() {
        let mut t = RuleTable::new();
        t.insert("Ping", Rule::Unconditional { fields: vec![] });
        assert_eq!(t.len(), 1);
        assert!(t.get("PING").is_some());
    }
}
