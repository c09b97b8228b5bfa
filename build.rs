use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match tonic_build::configure().compile(&["proto/gateway/v1/gateway.proto"], &["proto"]) {
        Ok(()) => Ok(()),
        // Fall back to the checked-in generated code when protoc is not
        // installed, so the crate still builds on machines without it.
        Err(err) if err.to_string().contains("protoc") => {
            println!("cargo:rerun-if-changed=proto/gateway/v1/gateway.proto");
            println!("cargo:rerun-if-changed=proto/gateway/v1/gateway.v1.rs");
            let out = PathBuf::from(env::var("OUT_DIR")?).join("gateway.v1.rs");
            fs::copy("proto/gateway/v1/gateway.v1.rs", out)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
