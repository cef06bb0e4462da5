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

use jiff::tz::TimeZone;

use crate::Error;
use crate::Layout;
use crate::layout::format_clock;
use crate::record::Record;

/// A layout for audit trails, carrying only the time and the message.
///
/// Output format:
///
/// ```text
/// 22:44:57.172 - user alice logged in
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuditLayout {
    tz: Option<TimeZone>,
}

impl AuditLayout {
    /// Set the timezone for timestamps. Defaults to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl Layout for AuditLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = format_clock(record.time(), self.tz.as_ref())?;
        Ok(format!("{time} - {}", record.args()).into_bytes())
    }
}
