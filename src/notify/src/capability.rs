//! Capability registry: answers "does this token implement interface X".
//!
//! Lookups walk a fixed chain of providers in precedence order. The chain is
//! built once at construction; nothing mutates it afterwards.

use crate::host::Ledger;
use ledger::token::INVALID_INTERFACE_ID;
use ledger::InterfaceId;

/// Interface id of the transfer-and-notify protocol.
pub const NOTIFY_INTERFACE_ID: InterfaceId = [0xb0, 0x20, 0x2a, 0x11];

/// One link in the lookup chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityProvider {
    /// Delegates to the base ledger's own capabilities.
    Ledger,
    /// A capability implemented by this extension.
    Own(InterfaceId),
}

impl CapabilityProvider {
    fn provides<L: Ledger + ?Sized>(&self, ledger: &L, id: InterfaceId) -> bool {
        match self {
            CapabilityProvider::Ledger => ledger.supports_interface(id),
            CapabilityProvider::Own(own) => *own == id,
        }
    }
}

/// Ordered chain of capability providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityRegistry {
    chain: Vec<CapabilityProvider>,
}

impl CapabilityRegistry {
    /// The chain for a notify token: the base ledger first, then the protocol itself.
    pub fn new() -> Self {
        Self {
            chain: vec![
                CapabilityProvider::Ledger,
                CapabilityProvider::Own(NOTIFY_INTERFACE_ID),
            ],
        }
    }

    /// The providers in lookup order.
    pub fn providers(&self) -> &[CapabilityProvider] {
        &self.chain
    }

    /// Whether `id` is supported by any provider. The reserved id `0xffffffff` never is.
    pub fn supports<L: Ledger + ?Sized>(&self, ledger: &L, id: InterfaceId) -> bool {
        if id == INVALID_INTERFACE_ID {
            return false;
        }
        self.chain.iter().any(|provider| provider.provides(ledger, id))
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
