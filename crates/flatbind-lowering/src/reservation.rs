//! Reserved names and staged records.
//!
//! A value record reserves its exported name before its fields are lowered so
//! that pointers back into it resolve. A record that resolves through such a
//! reservation cannot be registered on its own: the reserving record may still
//! fail. It is staged with the innermost reservation it waited on and only
//! reaches the registry once every reservation it waited on has committed.
//! When one of them fails, everything staged with it is dropped.

use rustc_hash::FxHashSet;

use flatbind_core::{ExportRecord, LoweringError, QualifiedName, SourceSite};

use crate::LoweringPass;

/// A record whose fields are being lowered.
#[derive(Debug)]
pub(crate) struct Reservation {
    pub(crate) name: QualifiedName,
    pub(crate) exported_name: String,
    /// Stack indices of enclosing reservations this record resolved through.
    waits_on: FxHashSet<usize>,
    /// Finished records waiting on this reservation, in completion order.
    staged: Vec<StagedRecord>,
}

impl Reservation {
    pub(crate) fn new(name: QualifiedName, exported_name: String) -> Self {
        Self {
            name,
            exported_name,
            waits_on: FxHashSet::default(),
            staged: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct StagedRecord {
    name: QualifiedName,
    site: SourceSite,
    record: ExportRecord,
}

/// Lookup entry for a staged record.
#[derive(Debug, Clone)]
pub(crate) struct Staged {
    pub(crate) exported_name: String,
    /// Stack index of the reservation holding the record.
    pub(crate) owner: usize,
}

impl LoweringPass<'_> {
    /// Whether `name` is registered, reserved, staged or has already failed.
    pub(crate) fn is_settled(&self, name: &QualifiedName) -> bool {
        self.registry.contains(name)
            || self.in_progress.iter().any(|r| &r.name == name)
            || self.staged.contains_key(name)
            || self.failed.contains(name)
    }

    /// Exported name of a reserved or staged record.
    ///
    /// The record being lowered is marked as waiting on the reservation that
    /// holds the name.
    pub(crate) fn reserved_name(&mut self, name: &QualifiedName) -> Option<String> {
        if let Some(index) = self.in_progress.iter().position(|r| &r.name == name) {
            let exported_name = self.in_progress[index].exported_name.clone();
            self.wait_on(index);
            return Some(exported_name);
        }
        self.staged_name(name)
    }

    /// Exported name of a staged record. Unlike [`Self::reserved_name`], a
    /// record still being lowered is not accepted, so value fields cannot
    /// contain their own enclosing record.
    pub(crate) fn staged_name(&mut self, name: &QualifiedName) -> Option<String> {
        let Staged {
            exported_name,
            owner,
        } = self.staged.get(name)?.clone();
        self.wait_on(owner);
        Some(exported_name)
    }

    fn wait_on(&mut self, index: usize) {
        let Some(current) = self.in_progress.len().checked_sub(1) else {
            return;
        };
        if index < current {
            self.in_progress[current].waits_on.insert(index);
        }
    }

    /// Register the record of a finished reservation, or stage it with the
    /// innermost enclosing reservation it still waits on.
    pub(crate) fn commit(
        &mut self,
        reservation: Reservation,
        site: &SourceSite,
        record: ExportRecord,
    ) {
        let index = self.in_progress.len();
        let Reservation {
            name,
            exported_name,
            waits_on,
            staged,
        } = reservation;

        let Some(owner) = waits_on.iter().copied().filter(|&i| i < index).max() else {
            for entry in staged {
                self.staged.remove(&entry.name);
                self.registry.insert(entry.name, entry.record);
            }
            self.registry.insert(name, record);
            return;
        };

        tracing::debug!(
            %name,
            waiting_on = %self.in_progress[owner].name,
            "record staged until its reservation commits"
        );
        let holder = &mut self.in_progress[owner];
        holder
            .waits_on
            .extend(waits_on.into_iter().filter(|&i| i < owner));
        for entry in staged {
            if let Some(lookup) = self.staged.get_mut(&entry.name) {
                lookup.owner = owner;
            }
            holder.staged.push(entry);
        }
        self.staged.insert(
            name.clone(),
            Staged {
                exported_name,
                owner,
            },
        );
        holder.staged.push(StagedRecord {
            name,
            site: site.clone(),
            record,
        });
    }

    /// Drop everything staged with a failed reservation.
    pub(crate) fn discard(&mut self, reservation: Reservation) {
        for entry in reservation.staged {
            tracing::debug!(name = %entry.name, failed = %reservation.name, "dropping staged record");
            self.staged.remove(&entry.name);
            self.failed.insert(entry.name);
            self.diagnostics.add_error(LoweringError::not_exported(
                &entry.site,
                reservation.name.to_string(),
            ));
        }
    }
}
