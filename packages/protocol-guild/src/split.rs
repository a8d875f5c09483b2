use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Uint128};

use crate::error::{Error, Result};

/// Shares are integer percentages
pub const TOTAL_SHARES: Uint128 = Uint128::new(100);

#[cw_serde]
pub struct DenomSplit {
    pub denom: String,
    pub split: SplitType,
}

#[cw_serde]
pub enum SplitType {
    Custom(SplitConfig),
}

impl SplitType {
    pub fn into_config(self) -> SplitConfig {
        match self {
            SplitType::Custom(config) => config,
        }
    }
}

#[cw_serde]
pub struct Receiver {
    pub addr:  String,
    pub share: Uint128,
}

#[cw_serde]
pub struct SplitConfig {
    pub receivers: Vec<Receiver>,
}

/// Who receives the units lost to rounding down each entitlement.
#[cw_serde]
#[derive(Copy, Default)]
pub enum RemainderPolicy {
    /// The last receiver in the list
    #[default]
    LastReceiver,

    /// The receiver with the largest share; the first one listed on a tie
    LargestShare,
}

impl SplitConfig {
    /// Check that the receivers are non-empty, unique, each hold a non-zero
    /// share, and that the shares add up to exactly 100.
    ///
    /// Address validation needs an `Api` and is left to the contract.
    pub fn validate(self) -> Result<Self> {
        if self.receivers.is_empty() {
            return Err(misconfig("no receivers"));
        }

        let mut seen = BTreeSet::new();
        let mut total = Uint128::zero();

        for receiver in &self.receivers {
            if !seen.insert(receiver.addr.as_str()) {
                return Err(misconfig(format!("duplicate receiver `{}`", receiver.addr)));
            }

            if receiver.share.is_zero() {
                return Err(misconfig(format!("receiver `{}` has a zero share", receiver.addr)));
            }

            total = total.checked_add(receiver.share)?;
        }

        if total != TOTAL_SHARES {
            return Err(misconfig(format!("shares add up to {total}, expecting {TOTAL_SHARES}")));
        }

        Ok(self)
    }

    /// Compute each receiver's entitlement to `amount`, in receiver order.
    ///
    /// Every receiver gets `floor(amount * share / 100)`; the remainder goes to
    /// the receiver picked by `policy`. The entitlements always add up to
    /// `amount`.
    pub fn distribute(&self, amount: Uint128, policy: RemainderPolicy) -> Result<Vec<(String, Uint128)>> {
        if self.receivers.is_empty() {
            return Err(misconfig("no receivers"));
        }

        let mut entitlements = self
            .receivers
            .iter()
            .map(|receiver| (receiver.addr.clone(), amount.multiply_ratio(receiver.share, TOTAL_SHARES)))
            .collect::<Vec<_>>();

        let distributed = entitlements
            .iter()
            .try_fold(Uint128::zero(), |total, (_, entitled)| total.checked_add(*entitled))?;
        let remainder = amount.checked_sub(distributed)?;

        if !remainder.is_zero() {
            let idx = self.remainder_receiver(policy);
            entitlements[idx].1 = entitlements[idx].1.checked_add(remainder)?;
        }

        Ok(entitlements)
    }

    /// Same as `distribute`, but as coins of `denom` and leaving out receivers
    /// who are entitled to nothing.
    pub fn distribute_coin(&self, coin: &Coin, policy: RemainderPolicy) -> Result<Vec<(String, Coin)>> {
        Ok(self
            .distribute(coin.amount, policy)?
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(addr, amount)| {
                (addr, Coin {
                    denom: coin.denom.clone(),
                    amount,
                })
            })
            .collect())
    }

    fn remainder_receiver(&self, policy: RemainderPolicy) -> usize {
        match policy {
            RemainderPolicy::LastReceiver => self.receivers.len() - 1,
            RemainderPolicy::LargestShare => {
                let mut best = 0;
                for (idx, receiver) in self.receivers.iter().enumerate() {
                    if receiver.share > self.receivers[best].share {
                        best = idx;
                    }
                }
                best
            },
        }
    }
}

fn misconfig(reason: impl Into<String>) -> Error {
    Error::SplitMisconfig {
        reason: reason.into(),
    }
}

// ----------------------------------- Tests -----------------------------------

#[cfg(test)]
mod tests {
    use cosmwasm_std::coin;

    use super::*;

    fn config(shares: &[(&str, u128)]) -> SplitConfig {
        SplitConfig {
            receivers: shares
                .iter()
                .map(|(addr, share)| Receiver {
                    addr:  addr.to_string(),
                    share: Uint128::new(*share),
                })
                .collect(),
        }
    }

    fn amounts(entitlements: Vec<(String, Uint128)>) -> Vec<u128> {
        entitlements.into_iter().map(|(_, amount)| amount.u128()).collect()
    }

    #[test]
    fn validating() {
        assert!(config(&[("a", 20), ("b", 70), ("c", 10)]).validate().is_ok());
        assert!(config(&[("a", 100)]).validate().is_ok());

        for bad in [
            config(&[]),
            config(&[("a", 20), ("b", 70)]),
            config(&[("a", 20), ("b", 70), ("c", 20)]),
            config(&[("a", 50), ("a", 50)]),
            config(&[("a", 100), ("b", 0)]),
        ] {
            let err = bad.validate().unwrap_err();
            assert!(matches!(err, Error::SplitMisconfig { .. }));
        }
    }

    #[test]
    fn shares_summing_past_u128_are_rejected() {
        let err = config(&[("a", u128::MAX), ("b", 1)]).validate().unwrap_err();
        assert!(matches!(err, Error::Overflow(_)));
    }

    #[test]
    fn distributing_evenly_divisible_amount() {
        let split = config(&[("a", 20), ("b", 70), ("c", 10)]);
        let res = split.distribute(Uint128::new(1_000_000), RemainderPolicy::LastReceiver).unwrap();
        assert_eq!(amounts(res), vec![200_000, 700_000, 100_000]);
    }

    #[test]
    fn remainder_goes_to_last_receiver() {
        let split = config(&[("a", 20), ("b", 70), ("c", 10)]);
        let res = split.distribute(Uint128::new(1_000_001), RemainderPolicy::LastReceiver).unwrap();
        assert_eq!(amounts(res), vec![200_000, 700_000, 100_001]);
    }

    #[test]
    fn remainder_goes_to_largest_share() {
        let split = config(&[("a", 20), ("b", 70), ("c", 10)]);
        let res = split.distribute(Uint128::new(1_000_001), RemainderPolicy::LargestShare).unwrap();
        assert_eq!(amounts(res), vec![200_000, 700_001, 100_000]);

        // ties go to the first one listed
        let split = config(&[("a", 25), ("b", 25), ("c", 25), ("d", 25)]);
        let res = split.distribute(Uint128::new(7), RemainderPolicy::LargestShare).unwrap();
        assert_eq!(amounts(res), vec![4, 1, 1, 1]);
    }

    #[test]
    fn conserving_every_amount() {
        let splits = [
            config(&[("a", 20), ("b", 70), ("c", 10)]),
            config(&[("a", 33), ("b", 33), ("c", 34)]),
            config(&[("a", 1), ("b", 99)]),
            config(&[("a", 100)]),
        ];

        for split in &splits {
            for amount in [0u128, 1, 2, 3, 7, 99, 100, 101, 999_999, 1_000_001, u128::MAX] {
                for policy in [RemainderPolicy::LastReceiver, RemainderPolicy::LargestShare] {
                    let total: u128 = amounts(split.distribute(Uint128::new(amount), policy).unwrap())
                        .into_iter()
                        .sum();
                    assert_eq!(total, amount);
                }
            }
        }
    }

    #[test]
    fn distributing_coins_skips_empty_entitlements() {
        // c is entitled to floor(0.5) and the remainder goes to a
        let split = config(&[("a", 50), ("b", 40), ("c", 10)]);
        let res = split.distribute_coin(&coin(5, "uatom"), RemainderPolicy::LargestShare).unwrap();
        assert_eq!(
            res,
            vec![("a".to_string(), coin(3, "uatom")), ("b".to_string(), coin(2, "uatom"))],
        );
    }

    #[test]
    fn parsing_wire_format() {
        let json = r#"{"custom":{"receivers":[{"addr":"a","share":"60"},{"addr":"b","share":"40"}]}}"#;
        let split: SplitType = serde_json_wasm::from_str(json).unwrap();
        assert_eq!(split.into_config(), config(&[("a", 60), ("b", 40)]));
    }
}
