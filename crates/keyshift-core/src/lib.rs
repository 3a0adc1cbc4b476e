pub mod char_map;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod keycodes;
pub mod matcher;
pub mod mod_tap;
pub mod modifiers;
pub mod presets;
pub mod sequence;
pub mod shift_level;
pub mod sink;
pub mod toggle;
pub mod types;

pub use char_map::{CharLookup, UsAscii};
pub use config::{load_config, parse_config, ConfigError, KeymapConfig};
pub use dispatcher::Dispatcher;
pub use sink::{HidReport, OutputSink};
pub use types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierBit, ModifierSet};
