//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements              | Connects to                    |
//! |--------------|-------------------------|--------------------------------|
//! | `fs_store`   | FileStorePort           | Working directory (`std::fs`)  |
//! | `gatt`       | GattHandler             | Platform GATT characteristic   |
//! |              | CommandLink (loopback)  | In-process client driver       |
//! | `log_sink`   | EventSink               | `log` facade                   |
//! | `stream`     | line framing            | stdio, TCP                     |
//! |              | CommandLink             | TCP client                     |

pub mod fs_store;
pub mod gatt;
pub mod log_sink;
pub mod stream;
