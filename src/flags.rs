use std::path::PathBuf;

xflags::xflags! {
    /// Inspect and normalize feed activity payloads.
    cmd streamfeed {
        /// TOML configuration file.
        optional -c, --config config: PathBuf

        /// Decode a payload and print the activity.
        cmd inspect {
            /// Payload file, `-` reads stdin.
            required path: PathBuf
        }

        /// Decode a payload and encode it again.
        cmd normalize {
            /// Payload file, `-` reads stdin.
            required path: PathBuf
        }
    }
}
