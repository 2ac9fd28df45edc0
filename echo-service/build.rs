use std::io::{Error, Result};

fn main() -> Result<()> {
    // List of proto files containing a message definition
    let proto_files = &[
        // Services
        "proto/echo.proto",
    ];

    // Name of the folder containing the proto definitions
    let proto_folder = "proto";

    for file in proto_files {
        println!("cargo:rerun-if-changed={file}");
    }

    // protox compiles the sources in-process, so no protoc install is required.
    let file_descriptor_set = protox::compile(proto_files, [proto_folder])
        .map_err(|err| Error::other(err.to_string()))?;

    tonic_prost_build::configure()
        .build_client(false)
        .compile_fds(file_descriptor_set)
}
