use cosmwasm_std::{attr, Api, BankMsg, DepsMut, Env, Response, SubMsg, SubMsgResult};
use protocol_guild::{
    split::{DenomSplit, SplitConfig, SplitType},
    splitter::InstantiateMsg,
};

use crate::{
    error::{ContractError, Result},
    state::{
        Distribution, DISTRIBUTIONS, FALLBACK_SPLIT, NEXT_DISTRIBUTION_ID, REMAINDER_POLICY,
        SPLITS,
    },
};

pub fn init(deps: DepsMut, msg: InstantiateMsg) -> Result<Response> {
    for DenomSplit { denom, split } in msg.splits {
        if SPLITS.has(deps.storage, &denom) {
            return Err(protocol_guild::Error::SplitMisconfig {
                reason: format!("more than one split for denom `{denom}`"),
            }
            .into());
        }

        let config = validate_split(deps.api, split)?;
        SPLITS.save(deps.storage, &denom, &config)?;
    }

    if let Some(split) = msg.fallback_split {
        FALLBACK_SPLIT.save(deps.storage, &validate_split(deps.api, split)?)?;
    }

    let policy = msg.remainder_policy.unwrap_or_default();
    REMAINDER_POLICY.save(deps.storage, &policy)?;
    NEXT_DISTRIBUTION_ID.save(deps.storage, &1)?;

    Ok(Response::new().add_attribute("method", "instantiate"))
}

fn validate_split(api: &dyn Api, split: SplitType) -> Result<SplitConfig> {
    let config = split.into_config().validate()?;
    for receiver in &config.receivers {
        api.addr_validate(&receiver.addr)?;
    }
    Ok(config)
}

/// Distribute every coin the contract holds.
///
/// Each bank send is a separate submessage so that one receiver refusing
/// funds doesn't block the others. The refused coins stay here and are
/// split again on the next tick.
pub fn tick(deps: DepsMut, env: Env) -> Result<Response> {
    let balances = deps.querier.query_all_balances(&env.contract.address)?;
    let fallback = FALLBACK_SPLIT.may_load(deps.storage)?;
    let policy = REMAINDER_POLICY.load(deps.storage)?;
    let mut next_id = NEXT_DISTRIBUTION_ID.load(deps.storage)?;

    let mut msgs = vec![];
    let mut attrs = vec![];

    for coin in balances {
        if coin.amount.is_zero() {
            continue;
        }

        let Some(split) = SPLITS.may_load(deps.storage, &coin.denom)?.or_else(|| fallback.clone()) else {
            attrs.push(attr("held", coin.to_string()));
            continue;
        };

        for (receiver, share) in split.distribute_coin(&coin, policy)? {
            attrs.push(attr("distribute", format!("{share}:{receiver}")));
            msgs.push(SubMsg::reply_always(
                BankMsg::Send {
                    to_address: receiver.clone(),
                    amount:     vec![share.clone()],
                },
                next_id,
            ));
            DISTRIBUTIONS.save(deps.storage, next_id, &Distribution {
                receiver,
                coin: share,
            })?;
            next_id += 1;
        }
    }

    NEXT_DISTRIBUTION_ID.save(deps.storage, &next_id)?;

    Ok(Response::new()
        .add_submessages(msgs)
        .add_attribute("method", "tick")
        .add_attributes(attrs))
}

pub fn after_distribution(deps: DepsMut, id: u64, result: SubMsgResult) -> Result<Response> {
    let Some(Distribution { receiver, coin }) = DISTRIBUTIONS.may_load(deps.storage, id)? else {
        return Err(ContractError::UnknownReplyId(id));
    };

    DISTRIBUTIONS.remove(deps.storage, id);

    let res = Response::new()
        .add_attribute("method", "after_distribution")
        .add_attribute("receiver", &receiver)
        .add_attribute("coin", coin.to_string());

    match result {
        SubMsgResult::Ok(_) => Ok(res.add_attribute("success", "true")),
        SubMsgResult::Err(err) => {
            deps.api.debug(&format!(
                "WASMDEBUG: failed to send {coin} to {receiver}, keeping it for the next tick: {err}"
            ));
            Ok(res.add_attribute("success", "false").add_attribute("error", err))
        },
    }
}

// ----------------------------------- Tests -----------------------------------

#[cfg(test)]
mod tests {
    use cosmwasm_std::{
        coin,
        testing::{
            mock_dependencies, mock_dependencies_with_balance, mock_env, MockApi, MockQuerier,
            MockStorage,
        },
        Coin, OwnedDeps, SubMsgResponse, Uint128,
    };
    use protocol_guild::split::{Receiver, RemainderPolicy};

    use super::*;

    const IBC_ATOM: &str = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";

    fn custom(shares: &[(&str, u128)]) -> SplitType {
        SplitType::Custom(SplitConfig {
            receivers: shares
                .iter()
                .map(|(addr, share)| Receiver {
                    addr:  addr.to_string(),
                    share: Uint128::new(*share),
                })
                .collect(),
        })
    }

    fn guild_split() -> SplitType {
        custom(&[("alice", 50), ("bob", 40), ("carol", 10)])
    }

    fn setup(
        balances: &[Coin],
        fallback: Option<SplitType>,
        policy: Option<RemainderPolicy>,
    ) -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
        let mut deps = mock_dependencies_with_balance(balances);
        init(deps.as_mut(), InstantiateMsg {
            splits:           vec![DenomSplit {
                denom: IBC_ATOM.into(),
                split: guild_split(),
            }],
            fallback_split:   fallback,
            remainder_policy: policy,
        })
        .unwrap();
        deps
    }

    fn send(to: &str, amount: Coin, id: u64) -> SubMsg {
        SubMsg::reply_always(
            BankMsg::Send {
                to_address: to.into(),
                amount:     vec![amount],
            },
            id,
        )
    }

    #[test]
    fn instantiating() {
        let deps = setup(&[], Some(custom(&[("dao", 100)])), None);

        assert_eq!(
            SPLITS.load(deps.as_ref().storage, IBC_ATOM).unwrap(),
            guild_split().into_config(),
        );
        assert_eq!(
            FALLBACK_SPLIT.load(deps.as_ref().storage).unwrap(),
            custom(&[("dao", 100)]).into_config(),
        );
        assert_eq!(REMAINDER_POLICY.load(deps.as_ref().storage).unwrap(), RemainderPolicy::LastReceiver);
        assert_eq!(NEXT_DISTRIBUTION_ID.load(deps.as_ref().storage).unwrap(), 1);
    }

    #[test]
    fn rejecting_misconfigured_splits() {
        let cases = [
            // shares don't add up to 100
            vec![DenomSplit {
                denom: "uatom".into(),
                split: custom(&[("alice", 50), ("bob", 40)]),
            }],
            // no receivers
            vec![DenomSplit {
                denom: "uatom".into(),
                split: custom(&[]),
            }],
            // same denom twice
            vec![
                DenomSplit {
                    denom: "uatom".into(),
                    split: custom(&[("alice", 100)]),
                },
                DenomSplit {
                    denom: "uatom".into(),
                    split: custom(&[("bob", 100)]),
                },
            ],
        ];

        for splits in cases {
            let mut deps = mock_dependencies();
            let err = init(deps.as_mut(), InstantiateMsg {
                splits,
                fallback_split:   None,
                remainder_policy: None,
            })
            .unwrap_err();
            assert!(matches!(err, ContractError::Guild(protocol_guild::Error::SplitMisconfig { .. })));
        }

        // invalid address
        let mut deps = mock_dependencies();
        let err = init(deps.as_mut(), InstantiateMsg {
            splits:           vec![DenomSplit {
                denom: "uatom".into(),
                split: custom(&[("Alice", 100)]),
            }],
            fallback_split:   None,
            remainder_policy: None,
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::Std(_)));

        // misconfigured fallback
        let mut deps = mock_dependencies();
        let err = init(deps.as_mut(), InstantiateMsg {
            splits:           vec![],
            fallback_split:   Some(custom(&[("alice", 99)])),
            remainder_policy: None,
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::Guild(protocol_guild::Error::SplitMisconfig { .. })));
    }

    #[test]
    fn splitting_forwarded_funds() {
        let mut deps = setup(&[coin(500000, IBC_ATOM)], None, None);

        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert_eq!(res.messages, vec![
            send("alice", coin(250000, IBC_ATOM), 1),
            send("bob", coin(200000, IBC_ATOM), 2),
            send("carol", coin(50000, IBC_ATOM), 3),
        ]);

        assert_eq!(
            DISTRIBUTIONS.load(deps.as_ref().storage, 2).unwrap(),
            Distribution {
                receiver: "bob".into(),
                coin:     coin(200000, IBC_ATOM),
            },
        );
        assert_eq!(NEXT_DISTRIBUTION_ID.load(deps.as_ref().storage).unwrap(), 4);
    }

    #[test]
    fn remainder_follows_policy() {
        let mut deps = setup(&[coin(1000001, IBC_ATOM)], None, None);
        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert_eq!(res.messages, vec![
            send("alice", coin(500000, IBC_ATOM), 1),
            send("bob", coin(400000, IBC_ATOM), 2),
            send("carol", coin(100001, IBC_ATOM), 3),
        ]);

        let mut deps = setup(&[coin(1000001, IBC_ATOM)], None, Some(RemainderPolicy::LargestShare));
        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert_eq!(res.messages, vec![
            send("alice", coin(500001, IBC_ATOM), 1),
            send("bob", coin(400000, IBC_ATOM), 2),
            send("carol", coin(100000, IBC_ATOM), 3),
        ]);
    }

    #[test]
    fn dust_skips_receivers_entitled_to_nothing() {
        let mut deps = setup(&[coin(1, IBC_ATOM)], None, None);

        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert_eq!(res.messages, vec![send("carol", coin(1, IBC_ATOM), 1)]);
    }

    #[test]
    fn unknown_denoms_use_fallback() {
        let mut deps = setup(
            &[coin(100, IBC_ATOM), coin(7, "untrn")],
            Some(custom(&[("dao", 60), ("treasury", 40)])),
            None,
        );

        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert_eq!(res.messages, vec![
            send("alice", coin(50, IBC_ATOM), 1),
            send("bob", coin(40, IBC_ATOM), 2),
            send("carol", coin(10, IBC_ATOM), 3),
            send("dao", coin(4, "untrn"), 4),
            send("treasury", coin(3, "untrn"), 5),
        ]);
    }

    #[test]
    fn unknown_denoms_are_held_without_fallback() {
        let mut deps = setup(&[coin(7, "untrn")], None, None);

        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert!(res.messages.is_empty());
        assert!(res.attributes.contains(&attr("held", "7untrn")));
        assert_eq!(NEXT_DISTRIBUTION_ID.load(deps.as_ref().storage).unwrap(), 1);
    }

    #[test]
    fn ticking_with_nothing_to_split() {
        let mut deps = setup(&[], None, None);

        let res = tick(deps.as_mut(), mock_env()).unwrap();
        assert!(res.messages.is_empty());
    }

    #[test]
    fn handling_distribution_replies() {
        let mut deps = setup(&[coin(500000, IBC_ATOM)], None, None);
        tick(deps.as_mut(), mock_env()).unwrap();

        let res = after_distribution(
            deps.as_mut(),
            1,
            SubMsgResult::Ok(SubMsgResponse {
                events: vec![],
                data:   None,
            }),
        )
        .unwrap();
        assert!(res.attributes.contains(&attr("success", "true")));

        let res = after_distribution(deps.as_mut(), 2, SubMsgResult::Err("blocked address".into()))
            .unwrap();
        assert!(res.attributes.contains(&attr("success", "false")));
        assert!(res.attributes.contains(&attr("receiver", "bob")));
        assert!(res.attributes.contains(&attr("coin", format!("200000{IBC_ATOM}"))));
        assert!(res.attributes.contains(&attr("error", "blocked address")));

        assert!(!DISTRIBUTIONS.has(deps.as_ref().storage, 1));
        assert!(!DISTRIBUTIONS.has(deps.as_ref().storage, 2));
        assert!(DISTRIBUTIONS.has(deps.as_ref().storage, 3));

        // replies are consumed once
        let err = after_distribution(deps.as_mut(), 2, SubMsgResult::Err("again".into())).unwrap_err();
        assert_eq!(err, ContractError::UnknownReplyId(2));
    }
}
