//! Regions command implementation

use serde::Serialize;
use std::process::ExitCode;

use super::{fail, resolve_settings, SettingsArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::command::UsageSummary;
use crate::config::CliOverrides;
use crate::grid::ColorLabel;
use crate::merge::Region;
use crate::pipeline;

#[derive(Serialize)]
struct RegionsReport<'a> {
    width: usize,
    height: usize,
    background: Option<&'a ColorLabel>,
    regions: &'a [Region],
    usage: &'a UsageSummary,
}

/// Run the regions command
///
/// Lists the rectangles the image decomposes into, without printing any
/// commands.
pub fn run_regions(args: &SettingsArgs, json: bool) -> ExitCode {
    let loaded = match resolve_settings(args, CliOverrides::default()) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e),
    };

    let conversion = match pipeline::run(&loaded.settings) {
        Ok(conversion) => conversion,
        Err(e) => return fail(&e),
    };

    if json {
        let report = RegionsReport {
            width: conversion.width,
            height: conversion.height,
            background: conversion.background.as_ref(),
            regions: &conversion.regions,
            usage: &conversion.batch.usage,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: Failed to serialize regions: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("Canvas: {}x{}", conversion.width, conversion.height);
    match &conversion.background {
        Some(bg) => println!("Background: {}", bg),
        None => println!("Background: (none)"),
    }
    println!("Regions: {}", conversion.regions.len());
    for region in &conversion.regions {
        println!(
            "  ({}, {})..({}, {})  {}x{}  {}",
            region.x0,
            region.y0,
            region.x1,
            region.y1,
            region.width(),
            region.height(),
            region.label
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}
