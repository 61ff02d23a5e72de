//! 標準入出力の Console

use crate::ports::outbound::Console;
use common::error::Error;
use std::io::{self, BufRead, Write};

pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&self, prompt: &str) -> Result<Option<String>, Error> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| Error::io_msg(format!("Failed to flush stdout: {}", e)))?;
        let mut line = String::new();
        let n = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(format!("Failed to read stdin: {}", e)))?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print(&self, text: &str) {
        println!("{}", text);
    }

    fn eprint(&self, text: &str) {
        eprintln!("{}", text);
    }
}
