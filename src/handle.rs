/*
 * This file is part of lmsensors.
 *
 * Copyright (C) 2025 lmsensors contributors
 *
 * lmsensors is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * lmsensors is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with lmsensors. If not, see <https://www.gnu.org/licenses/>.
 */

//! Shared ownership box behind every entity
//!
//! A `Handle` pairs one native record with the context an entity needs to
//! use it: the owning [`crate::Sensors`] for chips and buses, the parent
//! [`crate::ChipName`] for features, the parent [`crate::Feature`] for
//! subfeatures. It is immutable once built, and cloning an entity only bumps
//! the reference count.

use std::fmt;
use std::sync::Arc;

pub(crate) struct Handle<R, P> {
    shared: Arc<Shared<R, P>>,
}

struct Shared<R, P> {
    record: R,
    parent: P,
}

impl<R, P> Handle<R, P> {
    pub(crate) fn new(record: R, parent: P) -> Self {
        Self {
            shared: Arc::new(Shared { record, parent }),
        }
    }

    /// The wrapped native record, for passing back to the backend
    pub(crate) fn record(&self) -> &R {
        &self.shared.record
    }

    pub(crate) fn parent(&self) -> &P {
        &self.shared.parent
    }

    /// Whether both handles are backed by the same allocation
    pub(crate) fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    #[cfg(test)]
    pub(crate) fn holders(&self) -> usize {
        Arc::strong_count(&self.shared)
    }
}

impl<R, P> Clone for Handle<R, P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: fmt::Debug, P: fmt::Debug> fmt::Debug for Handle<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("record", &self.shared.record)
            .field("parent", &self.shared.parent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_allocation() {
        let handle = Handle::new(String::from("temp1"), 7u8);
        let copy = handle.clone();
        assert!(handle.shares_with(&copy));
        assert_eq!(handle.holders(), 2);
        assert_eq!(copy.record(), "temp1");
        assert_eq!(*copy.parent(), 7);
    }

    #[test]
    fn test_equal_records_are_distinct_handles() {
        let a = Handle::new(1u32, ());
        let b = Handle::new(1u32, ());
        assert!(!a.shares_with(&b));
        drop(b);
        assert_eq!(a.holders(), 1);
    }

    #[test]
    fn test_record_type_needs_no_clone() {
        struct NotClone(u8);
        let handle = Handle::new(NotClone(3), ());
        let copy = handle.clone();
        assert_eq!(copy.record().0, 3);
    }
}
