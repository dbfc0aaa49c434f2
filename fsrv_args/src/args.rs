use std::collections::HashMap;
use std::env;

pub struct ArgSpec {
  pub short: Option<String>,
  pub description: Option<String>,
  pub is_required: bool,
  pub is_flag: bool,
  pub validation: Option<Box<dyn Fn(&str) -> bool>>,
}

pub const DEFAULT_SPEC: ArgSpec = ArgSpec {
  short: None,
  description: None,
  is_required: false,
  is_flag: false,
  validation: None,
};

pub fn format_as_long(name: &str) -> String {
  format!("--{}", name)
}

pub fn format_as_short(name: &str) -> String {
  format!("-{}", name)
}

#[derive(Debug)]
pub enum ArgError {
  NoArgSpec,        // there is no definition for this argument
  RequiredNotFound, // required arg not found in args
  ValueNotFound,    // found the arg but no value
  InvalidValue,     // validation func returned false
}

pub struct Args {
  inner: HashMap<String, ArgSpec>,
}

impl Args {
  pub fn new() -> Args {
    Args {
      inner: HashMap::new(),
    }
  }

  pub fn add(&mut self, name: &str, spec: ArgSpec) {
    self.inner.insert(name.to_owned(), spec);
  }

  // gets the value of an argument and validates it if necessary.
  // an absent optional argument is Ok(None), same as a present flag
  pub fn get(&self, name: &str) -> Result<Option<String>, ArgError> {
    match self.inner.get(name) {
      Some(spec) => {
        match position_of(name, spec) {
          Some(pos) => {
            if spec.is_flag {
              return Ok(None);
            }
            match env::args().nth(pos + 1) {
              Some(val) => match &spec.validation {
                Some(validation_func) => {
                  if validation_func(val.as_str()) {
                    return Ok(Some(val));
                  } else {
                    return Err(ArgError::InvalidValue);
                  }
                }
                None => return Ok(Some(val)),
              },
              None => return Err(ArgError::ValueNotFound),
            }
          }
          None => {
            if spec.is_required {
              return Err(ArgError::RequiredNotFound);
            } else {
              return Ok(None);
            }
          }
        }
      }
      None => return Err(ArgError::NoArgSpec),
    }
  }

  // true when the flag (or its short form) is present on the command line
  pub fn is_set(&self, name: &str) -> bool {
    match self.inner.get(name) {
      Some(spec) => position_of(name, spec).is_some(),
      None => false,
    }
  }

  // checks that all args are present and valid.
  // the message is meant for the person holding the terminal
  pub fn check(&self) -> Result<(), String> {
    for (name, _spec) in self.inner.iter() {
      if let Err(err) = self.get(name) {
        match err {
          ArgError::RequiredNotFound => {
            return Err(format!("Missing required argument: {}", format_as_long(name)));
          }
          ArgError::InvalidValue => {
            return Err(format!(
              "An invalid value was provided for argument: {}",
              format_as_long(name)
            ));
          }
          ArgError::ValueNotFound => {
            return Err(format!("Expected a value for argument: {}", format_as_long(name)));
          }
          ArgError::NoArgSpec => {
            return Err(format!("This error shouldn't be possible here: {}", name));
          }
        }
      }
    }
    Ok(())
  }

  // renders help text from the registered descriptions
  pub fn usage(&self, program: &str) -> String {
    let mut lines = vec![format!("usage: {} [options]", program)];
    let mut names: Vec<&String> = self.inner.keys().collect();
    names.sort();
    for name in names {
      let spec = &self.inner[name];
      let mut flags = format_as_long(name);
      if let Some(short) = &spec.short {
        flags = format!("{}, {}", format_as_short(short), flags);
      }
      let description = match &spec.description {
        Some(description) => description.as_str(),
        None => "",
      };
      let required = if spec.is_required { " (required)" } else { "" };
      lines.push(format!("  {:<20}{}{}", flags, description, required));
    }
    return lines.join("\n");
  }
}

fn position_of(name: &str, spec: &ArgSpec) -> Option<usize> {
  env::args().position(|arg: String| {
    arg == format_as_long(name)
      || match &spec.short {
        Some(short_name) => arg == format_as_short(short_name),
        None => false,
      }
  })
}
