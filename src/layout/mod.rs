// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Layouts for formatting log records.

use std::fmt;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;
use crate::record::Record;

mod audit;
mod text;

pub use self::audit::AuditLayout;
pub use self::text::TextLayout;

/// A layout for formatting log records.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record into one line, without the trailing newline.
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Render `time` as `HH:MM:SS.mmm` in `tz`, or in the system time zone if `tz` is `None`.
pub(crate) fn format_clock(time: SystemTime, tz: Option<&TimeZone>) -> Result<String, Error> {
    let timestamp = Timestamp::try_from(time).map_err(|err| {
        Error::new(ErrorKind::Unexpected, "failed to convert record time").with_source(err)
    })?;
    let tz = tz.cloned().unwrap_or_else(TimeZone::system);
    Ok(timestamp.to_zoned(tz).strftime("%H:%M:%S.%3f").to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_format_clock_millis() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(3_723_045);
        let clock = format_clock(time, Some(&TimeZone::UTC)).unwrap();
        assert_eq!(clock, "01:02:03.045");
    }
}
