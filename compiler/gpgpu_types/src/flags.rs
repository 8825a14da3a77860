//! Ownership and storage flags of object types.

use bitflags::bitflags;

bitflags! {
    /// Storage and ownership state carried by an object type.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ObjectFlags: u8 {
        /// Lives in `global` kernel memory and must be dereferenced on read.
        const GLOBAL = 1 << 0;
        /// Passed by pointer into a helper and must be dereferenced on read.
        const REFERENCE = 1 << 1;
        /// Freshly constructed and unaliased, so it may be bound without a copy.
        const ORPHAN = 1 << 2;
        /// Has no storage yet; taking its address needs a temporary.
        const RVALUE = 1 << 3;

        /// State of a freshly built value.
        const FRESH = Self::ORPHAN.bits() | Self::RVALUE.bits();
    }
}
