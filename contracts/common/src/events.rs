//! Farm Events
//!
//! Events are emitted after a state-changing call commits and can be
//! indexed off-core for building UIs, analytics, and notifications.
//! Serializable with both serde and borsh for storage/transmission.

use crate::types::{Address, AssetId, PoolId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Administration (0x01 - 0x1F)
    PoolAdded = 0x01,
    PoolWeightChanged = 0x02,
    EmissionRateChanged = 0x03,
    PoolAccrued = 0x04,

    // User operations (0x20 - 0x3F)
    Deposited = 0x20,
    Withdrawn = 0x21,
    RewardsClaimed = 0x22,
}

/// Main event enum containing all farm events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum FarmEvent {
    /// Emitted when a new pool is appended to the set
    PoolAdded {
        pool_id: PoolId,
        asset_id: AssetId,
        weight: u64,
        total_weight: u64,
        step: u64,
    },

    /// Emitted when a pool's allocation weight changes
    PoolWeightChanged {
        pool_id: PoolId,
        old_weight: u64,
        new_weight: u64,
        total_weight: u64,
        step: u64,
    },

    /// Emitted when the global emission rate changes
    EmissionRateChanged {
        old_rate: u64,
        new_rate: u64,
        step: u64,
    },

    /// Emitted when a pool's accumulator is materialized
    /// administratively (mass accrual)
    PoolAccrued {
        pool_id: PoolId,
        reward_emitted: u64,
        step: u64,
    },

    /// Emitted when principal enters a pool
    Deposited {
        pool_id: PoolId,
        user: Address,
        amount: u64,
        reward_paid: u64,
        new_staked: u64,
        step: u64,
    },

    /// Emitted when principal leaves a pool
    Withdrawn {
        pool_id: PoolId,
        user: Address,
        amount: u64,
        reward_paid: u64,
        new_staked: u64,
        step: u64,
    },

    /// Emitted when accrued reward is paid without touching principal
    RewardsClaimed {
        pool_id: PoolId,
        user: Address,
        reward_paid: u64,
        step: u64,
    },
}

impl FarmEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::PoolAdded { .. } => EventType::PoolAdded,
            Self::PoolWeightChanged { .. } => EventType::PoolWeightChanged,
            Self::EmissionRateChanged { .. } => EventType::EmissionRateChanged,
            Self::PoolAccrued { .. } => EventType::PoolAccrued,
            Self::Deposited { .. } => EventType::Deposited,
            Self::Withdrawn { .. } => EventType::Withdrawn,
            Self::RewardsClaimed { .. } => EventType::RewardsClaimed,
        }
    }

    /// Get the step at which the event occurred
    pub fn step(&self) -> u64 {
        match self {
            Self::PoolAdded { step, .. } => *step,
            Self::PoolWeightChanged { step, .. } => *step,
            Self::EmissionRateChanged { step, .. } => *step,
            Self::PoolAccrued { step, .. } => *step,
            Self::Deposited { step, .. } => *step,
            Self::Withdrawn { step, .. } => *step,
            Self::RewardsClaimed { step, .. } => *step,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FarmEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: FarmEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[FarmEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<FarmEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&FarmEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when the log holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = FarmEvent::Deposited {
            pool_id: 0,
            user: [2u8; 32],
            amount: 500_00000000,
            reward_paid: 0,
            new_staked: 500_00000000,
            step: 100,
        };

        assert_eq!(event.event_type(), EventType::Deposited);
        assert_eq!(event.step(), 100);
    }

    #[test]
    fn test_event_serialization() {
        let event = FarmEvent::RewardsClaimed {
            pool_id: 2,
            user: [1u8; 32],
            reward_paid: 600_00000000,
            step: 200,
        };

        let bytes = event.to_bytes();
        let restored = FarmEvent::from_bytes(&bytes).unwrap();

        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(FarmEvent::PoolAdded {
            pool_id: 0,
            asset_id: [3u8; 32],
            weight: 50,
            total_weight: 50,
            step: 100,
        });

        log.emit(FarmEvent::Deposited {
            pool_id: 0,
            user: [2u8; 32],
            amount: 500_00000000,
            reward_paid: 0,
            new_staked: 500_00000000,
            step: 101,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let deposits = log.filter_by_type(EventType::Deposited);
        assert_eq!(deposits.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
