// Copyright 2026 bitstream developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Note that clippy attributes should be in sync with those declared in "lib.rs"
#![warn(clippy::all, clippy::nursery, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate
)]
// Some from restriction lint-group
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::empty_structs_with_brackets,
    clippy::exit,
    clippy::if_then_some_else_none,
    clippy::impl_trait_in_params,
    clippy::let_underscore_must_use,
    clippy::multiple_inherent_impl,
    clippy::print_stdout,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::separated_literal_suffix,
    clippy::str_to_string,
    clippy::string_add,
    clippy::string_to_string,
    clippy::try_err,
    clippy::unnecessary_self_imports,
    clippy::wildcard_enum_match_arm
)]

use clap::Parser;
use log::debug;
use log::info;

use bitstream::config;
use bitstream::error::Verified;
use bitstream::error::Verify;
use bitstream::error::VerifyError;
use bitstream::BitBuffer;

mod display;
mod op;

use op::Op;

/// Builds a bit buffer from append operations and prints it.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Operations applied in order: `bit:B`, `bits:BBB`, `run:B:N`, `int:V:W`.
    #[clap(required = true)]
    ops: Vec<Op>,
    /// If set, load config from the specified file.
    #[clap(short, long)]
    config: Option<String>,
    /// If set, dump the config used to the specified path.
    #[clap(long)]
    dump_config: Option<String>,
}

/// Exit codes of the process.
enum ExitCode {
    #[allow(dead_code)]
    Normal = 0,
    InvalidConfig = -1,
    InvalidOperation = -2,
    Io = -3,
}

fn load_config(path: Option<&str>) -> Result<config::Buffer, String> {
    let Some(path) = path else {
        return Ok(config::Buffer::default());
    };
    let conf_str =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read `{path}`: {e}"))?;
    toml::from_str(&conf_str).map_err(|e| format!("syntax error in `{path}`: {e}"))
}

fn verify_config(config: config::Buffer) -> Result<Verified<config::Buffer>, VerifyError> {
    config
        .into_verified()
        .map_err(|(_, e)| e.within("buffer_config"))
}

#[allow(clippy::let_underscore_must_use)]
fn build_buffer(config: &config::Buffer, ops: &[Op]) -> Result<BitBuffer, i32> {
    let mut buf = config.make_buffer();
    for (i, op) in ops.iter().enumerate() {
        debug!(target: "bitstream-bin::op", "#{i} {op:?} at bit {}", buf.len());
        if let Err(e) = op.apply(&mut buf) {
            let _ = display::show_error(&format!("operation #{i}: {e}"));
            return Err(ExitCode::InvalidOperation as i32);
        }
    }
    Ok(buf)
}

#[allow(clippy::let_underscore_must_use)]
fn main_body(args: Args) -> Result<(), i32> {
    let _ = display::show_banner();
    info!(
        target: "bitstream-bin::build_info::jsonl",
        "{{ version: \"{}\" }}",
        bitstream::constant::build_info::CRATE_VERSION,
    );

    let buffer_config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            let _ = display::show_error(&msg);
            return Err(ExitCode::InvalidConfig as i32);
        }
    };
    let buffer_config = verify_config(buffer_config).map_err(|e| {
        let _ = display::show_error(&e);
        ExitCode::InvalidConfig as i32
    })?;

    let buf = build_buffer(&buffer_config, &args.ops)?;
    info!(
        target: "bitstream-bin::result::jsonl",
        "{{ ops: {}, bits: {}, bytes: {} }}",
        args.ops.len(),
        buf.len(),
        buf.as_bytes().len(),
    );

    if let Some(path) = args.dump_config {
        let dumped = toml::to_string(&*buffer_config).map_err(|e| {
            let _ = display::show_error(&e);
            ExitCode::InvalidConfig as i32
        })?;
        std::fs::write(&path, dumped).map_err(|e| {
            let _ = display::show_error(&format!("cannot write `{path}`: {e}"));
            ExitCode::Io as i32
        })?;
    }

    display::show_buffer(&buf, &buffer_config.render).map_err(|_e| ExitCode::Io as i32)
}

fn main() -> Result<(), i32> {
    env_logger::Builder::from_env("BITSTREAM_LOG")
        .format_timestamp(None)
        .init();
    main_body(Args::parse())
}
