//! Partition of line items into use-type buckets.

use serde::Serialize;

use crate::models::MedicationRecord;

/// Records sharing one use-type label, in input order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicationGroup<'a> {
    /// Bucket label
    pub use_type: String,
    pub medications: Vec<&'a MedicationRecord>,
}

/// Group records by use-type label.
///
/// Buckets are ordered by the first appearance of their label and records
/// keep their relative order inside a bucket. Records with no use type (or
/// a blank custom one) land in the `default_label` bucket.
pub fn group_by_use_type<'a>(
    medications: &'a [MedicationRecord],
    default_label: &str,
) -> Vec<MedicationGroup<'a>> {
    let mut groups: Vec<MedicationGroup<'a>> = Vec::new();

    for medication in medications {
        let label = match medication.use_type_label() {
            label if label.is_empty() => default_label.to_string(),
            label => label,
        };

        // Buckets stay in first-seen order.
        match groups.iter_mut().find(|g| g.use_type == label) {
            Some(group) => group.medications.push(medication),
            None => groups.push(MedicationGroup {
                use_type: label,
                medications: vec![medication],
            }),
        }
    }

    groups
}
