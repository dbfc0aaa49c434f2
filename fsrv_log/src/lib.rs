extern crate chrono;
use chrono::prelude::*;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl LogLevel {
  // the numeric mapping the config file uses. keep it stable
  pub fn value(&self) -> u8 {
    match self {
      LogLevel::Error => 0,
      LogLevel::Warn => 1,
      LogLevel::Info => 2,
      LogLevel::Debug => 3,
      LogLevel::Trace => 4,
    }
  }

  pub fn from_value(value: u8) -> Option<LogLevel> {
    match value {
      0 => Some(LogLevel::Error),
      1 => Some(LogLevel::Warn),
      2 => Some(LogLevel::Info),
      3 => Some(LogLevel::Debug),
      4 => Some(LogLevel::Trace),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      LogLevel::Error => "ERROR",
      LogLevel::Warn => "WARN",
      LogLevel::Info => "INFO",
      LogLevel::Debug => "DEBUG",
      LogLevel::Trace => "TRACE",
    }
  }
}

pub trait Sink: Send {
  fn write(&mut self, level: &LogLevel, name: &str, msg: &str);
}

pub struct Logger {
  name: String,
  max_level: LogLevel,
  sinks: Arc<Mutex<Vec<Box<dyn Sink>>>>,
}

impl Logger {
  pub fn new(name: &str, max_level: LogLevel) -> Logger {
    Logger {
      name: name.to_owned(),
      max_level: max_level,
      sinks: Arc::new(Mutex::new(Vec::new())),
    }
  }

  // a logger for one part of the program. writes to the same sinks
  pub fn named(&self, component: &str) -> Logger {
    Logger {
      name: component.to_owned(),
      max_level: self.max_level,
      sinks: self.sinks.clone(),
    }
  }

  pub fn add_sink(&self, sink: Box<dyn Sink>) {
    if let Ok(mut sinks) = self.sinks.lock() {
      sinks.push(sink);
    }
  }

  pub fn set_level(&mut self, max_level: LogLevel) {
    self.max_level = max_level;
  }

  pub fn level(&self) -> LogLevel {
    self.max_level
  }

  pub fn log(&self, level: LogLevel, msg: &str) {
    // anything more verbose than the configured level gets dropped
    if level.value() > self.max_level.value() {
      return;
    }
    if let Ok(mut sinks) = self.sinks.lock() {
      for sink in sinks.iter_mut() {
        sink.write(&level, &self.name, msg);
      }
    }
  }

  pub fn error(&self, msg: &str) {
    self.log(LogLevel::Error, msg);
  }

  pub fn warn(&self, msg: &str) {
    self.log(LogLevel::Warn, msg);
  }

  pub fn info(&self, msg: &str) {
    self.log(LogLevel::Info, msg);
  }

  pub fn debug(&self, msg: &str) {
    self.log(LogLevel::Debug, msg);
  }

  pub fn trace(&self, msg: &str) {
    self.log(LogLevel::Trace, msg);
  }
}

pub struct ConsoleSink {
  queue: Arc<Mutex<Vec<String>>>,
}

impl ConsoleSink {
  pub fn new() -> ConsoleSink {
    let queue = Arc::new(Mutex::new(Vec::<String>::new()));
    let thread_queue = queue.clone();
    // messages get queued and written on a schedule so logging
    // never blocks the caller on stdout
    thread::spawn(move || {
      let stdout = io::stdout();
      let mut std_handle = io::BufWriter::new(stdout);
      loop {
        if let Ok(mut queue_guard) = thread_queue.lock() {
          for msg in queue_guard.drain(..) {
            let _ = writeln!(std_handle, "{}", msg);
          }
        }
        let _ = std_handle.flush();
        // sleep the thread for 1 second
        thread::sleep(Duration::from_secs(1));
      }
    });
    ConsoleSink { queue: queue }
  }
}

impl Sink for ConsoleSink {
  // add the message to the queue. it'll get picked up by the next write timer
  fn write(&mut self, level: &LogLevel, name: &str, msg: &str) {
    let cur_timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let formatted_msg = format!("[{}] [{}] [{}] {}", cur_timestamp, level.label(), name, msg);
    if let Ok(mut shared_queue) = self.queue.lock() {
      shared_queue.push(formatted_msg);
    }
  }
}
