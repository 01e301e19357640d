#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use lunden_session_adapters::{NavigationRecorder, WalletBridgeAdapter};
use lunden_session_core::{
    CredentialBootstrap, CredentialLookupPort, ExchangeResponse, PortError, SecretString,
};

pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

/// 32-byte keys the exchange hands out in the scenarios.
pub const KEY_A: &str = "0xabababababababababababababababababababababababababababababababab";
pub const KEY_B: &str = "0xcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcd";

pub const ACCOUNT_ID: &str = "jacky@example.org";
pub const PASSWORD: &str = "correct-horse-battery";

/// Lookup port fed from a scripted response queue.
#[derive(Clone, Default)]
pub struct ScriptedLookup {
    responses: Arc<Mutex<VecDeque<Result<ExchangeResponse, PortError>>>>,
    exchanges: Arc<AtomicUsize>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_granted(&self, p_key: &str) {
        self.push(Ok(ExchangeResponse {
            success: 1,
            p_key: Some(SecretString::new(p_key)),
        }));
    }

    pub fn push_denied(&self) {
        self.push(Ok(ExchangeResponse {
            success: 0,
            p_key: None,
        }));
    }

    pub fn push_error(&self, err: PortError) {
        self.push(Err(err));
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    fn push(&self, response: Result<ExchangeResponse, PortError>) {
        self.responses
            .lock()
            .expect("response queue")
            .push_back(response);
    }
}

#[async_trait]
impl CredentialLookupPort for ScriptedLookup {
    async fn exchange(
        &self,
        _account: &str,
        _password: &str,
    ) -> Result<ExchangeResponse, PortError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("response queue")
            .pop_front()
            .unwrap_or(Err(PortError::NotImplemented("no scripted response left")))
    }
}

pub struct BootstrapFixture {
    pub lookup: ScriptedLookup,
    pub bridge: Arc<WalletBridgeAdapter>,
    pub navigation: Arc<NavigationRecorder>,
    pub bootstrap: CredentialBootstrap<ScriptedLookup, WalletBridgeAdapter, NavigationRecorder>,
}

pub fn bootstrap_fixture() -> BootstrapFixture {
    let lookup = ScriptedLookup::new();
    let bridge = Arc::new(WalletBridgeAdapter::in_memory());
    let navigation = Arc::new(NavigationRecorder::default());
    let bootstrap = CredentialBootstrap::new(
        lookup.clone(),
        Arc::clone(&bridge),
        Arc::clone(&navigation),
        TEST_TIMEOUT,
        0,
    );
    BootstrapFixture {
        lookup,
        bridge,
        navigation,
        bootstrap,
    }
}
