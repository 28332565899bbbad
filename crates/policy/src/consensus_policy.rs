use forecast::Trend;

use crate::signal::Signal;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    /// Votes one direction needs to produce a signal
    pub min_votes: usize,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self { min_votes: 3 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConsensusDecision {
    pub signal: Signal,
    pub ups: usize,
    pub downs: usize,
}

/// Counts UP-family and DOWN-family votes; BUY is checked first
pub fn consensus_decision(trends: &[Trend], params: ConsensusParams) -> ConsensusDecision {
    let ups = trends.iter().filter(|t| t.is_up_family()).count();
    let downs = trends.iter().filter(|t| t.is_down_family()).count();

    let signal = if ups >= params.min_votes {
        Signal::Buy
    } else if downs >= params.min_votes {
        Signal::Sell
    } else {
        Signal::Hold
    };

    ConsensusDecision { signal, ups, downs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(trends: &[Trend]) -> ConsensusDecision {
        consensus_decision(trends, ConsensusParams::default())
    }

    #[test]
    fn three_ups_buy() {
        let d = decide(&[Trend::Up, Trend::Up, Trend::Up, Trend::Down]);
        assert_eq!(d.signal, Signal::Buy);
        assert_eq!((d.ups, d.downs), (3, 1));
    }

    #[test]
    fn split_vote_holds() {
        let d = decide(&[Trend::Up, Trend::Down, Trend::Flat, Trend::Down]);
        assert_eq!(d.signal, Signal::Hold);
    }

    #[test]
    fn strong_labels_count_for_their_family() {
        let d = decide(&[Trend::StrongDown, Trend::Down, Trend::StrongDown, Trend::Up]);
        assert_eq!(d.signal, Signal::Sell);
    }

    #[test]
    fn unavailable_trends_do_not_vote() {
        let d = decide(&[Trend::NotAvailable; 4]);
        assert_eq!(d.signal, Signal::Hold);
        assert_eq!((d.ups, d.downs), (0, 0));
    }

    #[test]
    fn lowered_quorum_prefers_buy_on_tie() {
        let d = consensus_decision(
            &[Trend::Up, Trend::Up, Trend::Down, Trend::Down],
            ConsensusParams { min_votes: 2 },
        );
        assert_eq!(d.signal, Signal::Buy);
    }
}
