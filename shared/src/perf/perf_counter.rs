/// Diagnostic events counted per component kind while diagnostic mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerfCounter {
    FullSend,
    DeltaSend,
    NoChangeSkip,
    CreationSend,
    CreationQueued,
    CreationDropped,
    BlockedConnection,
    ClassifierCacheHit,
    ClassifierCacheMiss,
    Destroyed,
}

impl PerfCounter {
    pub fn label(&self) -> &'static str {
        match self {
            PerfCounter::FullSend => "FullSend",
            PerfCounter::DeltaSend => "DeltaSend",
            PerfCounter::NoChangeSkip => "NoChangeSkip",
            PerfCounter::CreationSend => "CreationSend",
            PerfCounter::CreationQueued => "CreationQueued",
            PerfCounter::CreationDropped => "CreationDropped",
            PerfCounter::BlockedConnection => "BlockedConnection",
            PerfCounter::ClassifierCacheHit => "ClassifierCacheHit",
            PerfCounter::ClassifierCacheMiss => "ClassifierCacheMiss",
            PerfCounter::Destroyed => "Destroyed",
        }
    }
}
