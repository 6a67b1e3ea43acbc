pub mod candidates;
pub mod catalog;
pub mod config;
pub mod events;
pub mod metrics;
pub mod print;
pub mod prober;
pub mod scan_cache;
pub mod selection;
pub mod session;
pub mod taxonomy;
pub mod testing;

pub use candidates::{
    asset_url, encode_path, generate_candidates, mark_scheme_path, question_path, IMAGE_EXTENSION,
    MARK_SCHEMES_FOLDER, MAX_QUESTION_NUMBER, QUESTIONS_FOLDER,
};
pub use catalog::{CatalogStore, FilterSignature, FilterState, Item, ItemKey, SubjectYear};
pub use config::{
    load_config, load_config_from_str, validate_config, AssetsConfig, CacheConfig, Config,
    ConfigError, PrintConfig, ProbeMethod, ProberBackend, ProberConfig, SanitizedConfig,
    ServerConfig,
};
pub use events::{dispatch, EventError, EventOutcome, UiEvent};
pub use print::{
    build_print_document, DirectoryTarget, PrintDocument, PrintError, PrintReceipt, PrintRequest,
    PrintTarget, PrintType,
};
pub use prober::{
    create_prober, AssetProber, BatchProber, FsProber, HttpProber, ProbeError, ProbeOutcome,
};
pub use scan_cache::{CacheStats, CacheStatus, ScanCache, DEFAULT_TTL};
pub use selection::SelectionSet;
pub use session::{LoadOutcome, PrintOutcome, Session, SessionStats};
pub use taxonomy::{topics_for_subject, Difficulty, FALLBACK_TOPICS, SUBJECTS, YEARS};
