//! Cycle state-machine tests against a mock ledger
//!
//! Each test drives one full adjustment cycle and checks both the returned
//! outcome and exactly which transactions were submitted.

use std::sync::Mutex;

use async_trait::async_trait;
use xagpeg::{
    run_cycle, Config, CycleOutcome, Error, Ledger, OracleRecord, PoolState, PriceData, PriceEntry,
    Result,
};

/// A transaction the mock saw
#[derive(Debug, Clone, PartialEq)]
enum Submission {
    Create,
    Deposit(f64),
    Withdraw(f64),
}

/// In-memory [`Ledger`] with scripted oracle and pool responses
struct MockLedger {
    record: OracleRecord,
    pool: Option<PoolState>,
    submissions: Mutex<Vec<Submission>>,
}

impl MockLedger {
    fn new(record: OracleRecord, pool: Option<PoolState>) -> Self {
        MockLedger {
            record,
            pool,
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn record_submission(&self, submission: Submission) {
        self.submissions.lock().unwrap().push(submission);
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn oracle_record(&self, _account: &str, _document_id: u32) -> Result<OracleRecord> {
        Ok(self.record.clone())
    }

    async fn amm_pool(&self) -> Result<Option<PoolState>> {
        Ok(self.pool.clone())
    }

    async fn create_pool(&self) -> Result<()> {
        self.record_submission(Submission::Create);
        Ok(())
    }

    async fn deposit(&self, xrp: f64) -> Result<()> {
        self.record_submission(Submission::Deposit(xrp));
        Ok(())
    }

    async fn withdraw(&self, xrp: f64) -> Result<()> {
        self.record_submission(Submission::Withdraw(xrp));
        Ok(())
    }
}

fn quote(base: &str, quote: &str, mantissa: &str) -> PriceEntry {
    PriceEntry {
        price_data: PriceData {
            base_asset: base.to_string(),
            quote_asset: quote.to_string(),
            asset_price: Some(mantissa.to_string()),
            scale: Some(8),
        },
    }
}

/// XAG/USD at 30.00, XRP/USD at 0.60 -> target 54.0 with the 8% premium
fn oracle_record() -> OracleRecord {
    OracleRecord {
        series: vec![
            quote("XAG", "USD", "b2d05e00"), // 3_000_000_000 / 1e8 = 30.0
            quote("XRP", "USD", "3938700"),  // 60_000_000 / 1e8 = 0.6
        ],
    }
}

fn pool(xrp: f64, asset: f64) -> PoolState {
    PoolState {
        account: "rPoo1AcCoUnTxxxxxxxxxxxxxxxxxxxxxx".to_string(),
        xrp,
        asset,
    }
}

#[tokio::test]
async fn test_underpriced_pool_gets_capped_deposit() {
    // Implied 50 vs target 54 -> deviation ~ -7.4%, raw adjustment 1481 XRP,
    // capped at 1000
    let ledger = MockLedger::new(oracle_record(), Some(pool(50_000.0, 1_000_000.0)));
    let config = Config::default();

    let outcome = run_cycle(&ledger, &config).await.unwrap();

    match outcome {
        CycleOutcome::Deposited { xrp, deviation } => {
            assert!((xrp - 1_000.0).abs() < 1e-9);
            assert!(deviation < 0.0);
        }
        other => panic!("expected deposit, got {:?}", other),
    }
    assert_eq!(ledger.submissions(), vec![Submission::Deposit(1_000.0)]);
}

#[tokio::test]
async fn test_overpriced_pool_gets_proportional_withdrawal() {
    // Implied 55 vs target 54 -> deviation ~ +1.85%, adjustment ~ 370 XRP
    let ledger = MockLedger::new(oracle_record(), Some(pool(55_000.0, 1_000_000.0)));
    let config = Config::default();

    let outcome = run_cycle(&ledger, &config).await.unwrap();

    let expected = ((55.0 - 54.0) / 54.0) * 20_000.0;
    match outcome {
        CycleOutcome::Withdrew { xrp, deviation } => {
            assert!((xrp - expected).abs() < 1e-6);
            assert!(deviation > 0.0);
        }
        other => panic!("expected withdrawal, got {:?}", other),
    }
    match ledger.submissions().as_slice() {
        [Submission::Withdraw(xrp)] => assert!((xrp - expected).abs() < 1e-6),
        other => panic!("expected one withdrawal, got {:?}", other),
    }
}

#[tokio::test]
async fn test_within_threshold_submits_nothing() {
    // Implied exactly 54 -> deviation 0
    let ledger = MockLedger::new(oracle_record(), Some(pool(54_000.0, 1_000_000.0)));
    let config = Config::default();

    let outcome = run_cycle(&ledger, &config).await.unwrap();

    match outcome {
        CycleOutcome::Held { implied, target, .. } => {
            assert!((implied - 54.0).abs() < 1e-9);
            assert!((target - 54.0).abs() < 1e-9);
        }
        other => panic!("expected hold, got {:?}", other),
    }
    assert!(ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_missing_pool_is_created_and_cycle_ends() {
    let ledger = MockLedger::new(oracle_record(), None);
    let config = Config::default();

    let outcome = run_cycle(&ledger, &config).await.unwrap();

    assert_eq!(outcome, CycleOutcome::SeededPool);
    assert_eq!(ledger.submissions(), vec![Submission::Create]);
}

#[tokio::test]
async fn test_missing_xrp_quote_fails_cycle_without_submissions() {
    let record = OracleRecord {
        series: vec![quote("XAG", "USD", "b2d05e00")],
    };
    let ledger = MockLedger::new(record, Some(pool(50_000.0, 1_000_000.0)));
    let config = Config::default();

    let err = run_cycle(&ledger, &config).await.unwrap_err();

    match err {
        Error::QuoteMissing { base, quote } => {
            assert_eq!(base, "XRP");
            assert_eq!(quote, "USD");
        }
        other => panic!("expected missing quote, got {:?}", other),
    }
    assert!(ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_drained_pool_fails_cycle_without_submissions() {
    let ledger = MockLedger::new(oracle_record(), Some(pool(20_000.0, 0.0)));
    let config = Config::default();

    let err = run_cycle(&ledger, &config).await.unwrap_err();

    assert!(matches!(err, Error::PoolDrained { .. }));
    assert!(ledger.submissions().is_empty());
}
