//! License-file component.

use projforge_core::{
    application::{Component, SynthContext},
    domain::DomainError,
    error::ForgeResult,
};

const MIT_TEXT: &str = r#"MIT License

Copyright (c) $YEAR $OWNER

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#;

const APACHE_TEXT: &str = r#"Copyright $YEAR $OWNER

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
"#;

/// Emits a `LICENSE` file from an SPDX identifier.
pub struct LicenseFile {
    spdx: String,
    year: String,
    owner: String,
}

impl LicenseFile {
    pub fn new(
        spdx: impl Into<String>,
        year: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            spdx: spdx.into(),
            year: year.into(),
            owner: owner.into(),
        }
    }

    fn body(&self) -> Result<&'static str, DomainError> {
        match self.spdx.as_str() {
            "MIT" => Ok(MIT_TEXT),
            "Apache-2.0" => Ok(APACHE_TEXT),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unsupported license id: {other}"
            ))),
        }
    }
}

impl Component for LicenseFile {
    fn name(&self) -> &str {
        "license-file"
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let text = self
            .body()?
            .replace("$YEAR", &self.year)
            .replace("$OWNER", &self.owner);
        ctx.write_file("LICENSE", &text)
    }
}
