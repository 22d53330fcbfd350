use settler::domain::ports::{OracleBox, SettlementOracle};
use settler::error::OracleError;
use settler::infrastructure::oracle::{AlwaysAcceptOracle, AlwaysRejectOracle, WinningIdOracle};

// Oracles are injected as boxed trait objects; make sure dispatch through
// the box behaves like the concrete types.
#[tokio::test]
async fn test_oracle_dynamic_dispatch() {
    let oracles: Vec<(OracleBox, bool)> = vec![
        (Box::new(AlwaysAcceptOracle), true),
        (Box::new(AlwaysRejectOracle), false),
        (Box::new(WinningIdOracle::new(7)), true),
        (Box::new(WinningIdOracle::new(8)), false),
    ];

    for (oracle, expected) in &oracles {
        assert_eq!(oracle.settle(7).await.unwrap(), *expected);
    }
}

struct UnreachableGatewayOracle;

#[async_trait::async_trait]
impl SettlementOracle for UnreachableGatewayOracle {
    async fn settle(&self, id: u64) -> Result<bool, OracleError> {
        Err(OracleError(format!("gateway unreachable for {id}")))
    }
}

#[tokio::test]
async fn test_custom_oracle_implementations_plug_in() {
    let oracle: OracleBox = Box::new(UnreachableGatewayOracle);
    let err = oracle.settle(1).await.unwrap_err();
    assert!(err.to_string().contains("gateway unreachable"));
}
