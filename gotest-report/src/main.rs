// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use gotest_report::GoTestReportApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = GoTestReportApp::parse();
    let code = app.exec()?;
    std::process::exit(code);
}
