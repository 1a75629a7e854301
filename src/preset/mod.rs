//! Preset programs: the four labeled hooks of a Superscope preset.
//!
//! Preset text is a sequence of lines. A line whose trimmed text starts with
//! one of the labels `init:`, `frame:`/`per_frame:`, `point:`/`per_point:`
//! or `beat:` (any case) sets that hook's code to the rest of the line.
//! Later labels override earlier ones; other lines are ignored. Text with no
//! label at all is a point-only preset.

pub mod block;
pub mod samples;

pub use block::Block;

use crate::dsl::Diagnostic;
use crate::environment::Environment;

/// Point code used when a preset provides none: a flat horizontal line.
pub const DEFAULT_POINT_CODE: &str = "x=i*2-1;y=0";

/// The four hooks, in no particular execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Init,
    Frame,
    Point,
    Beat,
}

impl Hook {
    pub const ALL: [Hook; 4] = [Hook::Init, Hook::Frame, Hook::Point, Hook::Beat];

    pub fn name(self) -> &'static str {
        match self {
            Hook::Init => "init",
            Hook::Frame => "frame",
            Hook::Point => "point",
            Hook::Beat => "beat",
        }
    }
}

const LABELS: [(&str, Hook); 6] = [
    ("init:", Hook::Init),
    ("per_frame:", Hook::Frame),
    ("frame:", Hook::Frame),
    ("per_point:", Hook::Point),
    ("point:", Hook::Point),
    ("beat:", Hook::Beat),
];

/// Source code of a preset, split into hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetProgram {
    pub init: String,
    pub frame: String,
    pub point: String,
    pub beat: String,
    /// The text the program was parsed from, for echoing back to an editor.
    pub raw: String,
}

impl Default for PresetProgram {
    fn default() -> Self {
        Self {
            init: String::new(),
            frame: String::new(),
            point: DEFAULT_POINT_CODE.to_string(),
            beat: String::new(),
            raw: String::new(),
        }
    }
}

impl PresetProgram {
    /// Parse preset text. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut program = Self {
            raw: text.to_string(),
            ..Self::default()
        };
        let mut labeled = false;

        for line in text.lines() {
            let line = line.trim();
            let Some((hook, code)) = split_label(line) else {
                continue;
            };
            labeled = true;
            let code = code.trim();
            // An empty point label keeps the default so there is always something to draw.
            if hook == Hook::Point && code.is_empty() {
                continue;
            }
            *program.code_mut(hook) = code.to_string();
        }

        if !labeled && !text.trim().is_empty() {
            program.point = text.replace('\r', "");
        }

        program
    }

    pub fn code(&self, hook: Hook) -> &str {
        match hook {
            Hook::Init => &self.init,
            Hook::Frame => &self.frame,
            Hook::Point => &self.point,
            Hook::Beat => &self.beat,
        }
    }

    fn code_mut(&mut self, hook: Hook) -> &mut String {
        match hook {
            Hook::Init => &mut self.init,
            Hook::Frame => &mut self.frame,
            Hook::Point => &mut self.point,
            Hook::Beat => &mut self.beat,
        }
    }

    /// Compile every hook against `env`.
    pub fn compile(&self, env: &mut Environment) -> CompiledPreset {
        let mut diagnostics = Vec::new();
        let mut compile_hook = |hook: Hook, env: &mut Environment| {
            let (block, diags) = Block::compile(self.code(hook), env);
            diagnostics.extend(diags.into_iter().map(|d| (hook, d)));
            block
        };

        let init = compile_hook(Hook::Init, env);
        let frame = compile_hook(Hook::Frame, env);
        let point = compile_hook(Hook::Point, env);
        let beat = compile_hook(Hook::Beat, env);

        CompiledPreset {
            init,
            frame,
            point,
            beat,
            diagnostics,
        }
    }
}

fn split_label(line: &str) -> Option<(Hook, &str)> {
    LABELS.iter().find_map(|&(label, hook)| {
        let head = line.get(..label.len())?;
        head.eq_ignore_ascii_case(label)
            .then(|| (hook, &line[label.len()..]))
    })
}

/// A preset with every hook compiled.
#[derive(Debug, Clone, Default)]
pub struct CompiledPreset {
    pub init: Block,
    pub frame: Block,
    pub point: Block,
    pub beat: Block,
    pub diagnostics: Vec<(Hook, Diagnostic)>,
}

impl CompiledPreset {
    pub fn block(&self, hook: Hook) -> &Block {
        match hook {
            Hook::Init => &self.init,
            Hook::Frame => &self.frame,
            Hook::Point => &self.point,
            Hook::Beat => &self.beat,
        }
    }
}
