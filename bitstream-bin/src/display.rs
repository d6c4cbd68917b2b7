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

//! A module for a fancy output for "bitstream-bin".

use std::fmt::Write as _;
use std::io::Write;

use termcolor::Color;
use termcolor::ColorChoice;
use termcolor::ColorSpec;
use termcolor::StandardStream;
use termcolor::WriteColor;

use bitstream::config;
use bitstream::BitBuffer;

const CRATE_VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
    Some(v) => v,
    None => "unknown",
};

/// Formats bytes as space-separated upper-case hex.
#[allow(clippy::let_underscore_must_use)]
pub fn hex_string(bytes: &[u8]) -> String {
    let mut ret = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            ret.push(' ');
        }
        let _ = write!(ret, "{b:02X}");
    }
    ret
}

/// Show the initial banner.
pub fn show_banner() -> Result<(), std::io::Error> {
    let mut termout = StandardStream::stderr(ColorChoice::Auto);
    termout.set_color(ColorSpec::new().set_bold(true))?;
    write!(termout, "\n{:>10} ", "bitstream")?;
    termout.reset()?;
    writeln!(
        termout,
        "(engine v{}, CLI v{})",
        bitstream::constant::build_info::CRATE_VERSION,
        CRATE_VERSION
    )
}

fn show_field(termout: &mut StandardStream, label: &str, value: &str) -> Result<(), std::io::Error> {
    termout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(termout, "{label:>10} ")?;
    termout.reset()?;
    writeln!(termout, "{value}")
}

/// Prints the renderings of `buf` to stdout.
pub fn show_buffer(buf: &BitBuffer, render: &config::Render) -> Result<(), std::io::Error> {
    let mut termout = StandardStream::stdout(ColorChoice::Auto);
    show_field(&mut termout, "Bits", &buf.describe())?;
    show_field(&mut termout, "Grouped", &buf.render(render))?;
    show_field(
        &mut termout,
        "Bytes",
        &format!("{} [{} bytes]", hex_string(buf.as_bytes()), buf.as_bytes().len()),
    )
}

/// Prints an error message to stderr.
pub fn show_error<E: std::fmt::Display>(err: &E) -> Result<(), std::io::Error> {
    let mut termout = StandardStream::stderr(ColorChoice::Auto);
    termout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(termout, "{:>10} ", "Error")?;
    termout.reset()?;
    writeln!(termout, "{err}")
}
