//! URLs for the dashboard's external-tab actions.
//!
//! The tab-open sink itself is a presentation collaborator; only the URL
//! construction lives here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Send,
    Swap,
    History,
}

/// Build the external URL for a dashboard action. `chain` is the
/// connected site's chain identifier when one is known; only the swap
/// surface consumes it.
pub fn action_url(action: DashboardAction, address: &str, chain: Option<&str>) -> String {
    match action {
        DashboardAction::Send => "https://debank.com/send".to_owned(),
        DashboardAction::History => format!("https://debank.com/profile/{address}/history"),
        DashboardAction::Swap => match chain {
            Some(chain) => format!("https://debank.com/swap?chain={chain}"),
            None => "https://debank.com/swap".to_owned(),
        },
    }
}

pub fn explorer_url(address: &str) -> String {
    format!("https://etherscan.io/address/{address}")
}
