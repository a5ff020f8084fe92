use chrono::Local;
use csv::Writer;
use log::info;
use simplelog::*;
use std::error::Error;
use std::fs::File;

/// Sets up terminal logging (and a timestamped log file if `to_file`).
/// loglevel: "off"/"none" disables logging, otherwise "debug", "info", "warn" or "error";
/// `None` means "info". Calling it twice keeps the first logger.
pub fn init_logger(loglevel: Option<&str>, to_file: bool) -> Result<(), String> {
    let log_option = match loglevel {
        None => LevelFilter::Info,
        Some("off") | Some("none") => return Ok(()),
        Some("debug") => LevelFilter::Debug,
        Some("info") => LevelFilter::Info,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        Some(other) => {
            return Err(format!(
                "loglevel must be off, none, debug, info, warn or error, got '{}'",
                other
            ));
        }
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let file = File::create(&name).map_err(|e| format!("can not create {}: {}", name, e))?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("Program started with loglevel: {}", log_option);
            Ok(())
        }
        // a logger is already installed, keep it
        Err(_) => Ok(()),
    }
}

/// one sampled curve: row label plus (input, value) pairs
pub struct SampledCurve {
    pub label: String,
    pub samples: Vec<(f64, f64)>,
}

/// saves sampled curves as csv with columns curve, input, value
pub fn save_samples_to_csv(filename: &str, curves: &[SampledCurve]) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["curve", "input", "value"])?;
    for curve in curves {
        for (input, value) in &curve.samples {
            writer.write_record([curve.label.clone(), input.to_string(), value.to_string()])?;
        }
    }
    writer.flush()?;
    info!("{} curves saved to {}", curves.len(), filename);
    Ok(())
}
