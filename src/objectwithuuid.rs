use uuid::Uuid;

/// Objects that carry a stable identity, e.g. exported reports that may be
/// cross-referenced after download.
pub trait ObjectWithUUID {
    fn uuid(&self) -> &Uuid;
}
