//! Board descriptions for the Kinesis matrix scanner.
//!
//! A board is described by one JSON file: matrix size and wiring, debounce
//! policy, the physical layout of the keys and the keymap layers in that
//! layout. [`BoardConfig::validate`] checks the description and resolves
//! key names into a [`Board`], which generates the Rust module that
//! `kinesis-matrix` includes at build time.

pub mod format;
pub mod keycode;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{quote, ToTokens, TokenStreamExt};
use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

pub const MAX_ROWS: usize = 255;
pub const MAX_COLS: usize = 16;
pub const FN_KEYS: usize = 8;

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Name of the generated module, a lowercase identifier.
    pub name: String,
    pub matrix: MatrixConfig,
    /// Physical rows of keys, each a list of `[row, col]` matrix cells.
    pub layout: Vec<Vec<Cell>>,
    /// Key names in the shape of `layout`.
    pub layers: Vec<Layer>,
    /// Layer and tap key of `FN0..=FN7`.
    pub fn_keys: Vec<FnKey>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    pub rows: usize,
    pub cols: usize,
    /// One pin per row, e.g. `"F4"`.
    pub row_pins: Vec<String>,
    pub columns: Columns,
    pub debounce: Debounce,
    #[serde(default)]
    pub ghost_detection: bool,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Columns {
    /// All columns on one 8-bit port, e.g. `"B"`.
    Port(String),
    /// One pin per column.
    Pins(Vec<String>),
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Debounce {
    SwapBuffer {
        threshold: u8,
    },
    ShadowCommit {
        threshold: u8,
        #[serde(default = "default_pause_ms")]
        pause_ms: u32,
    },
}

fn default_pause_ms() -> u32 {
    1
}

impl Debounce {
    pub fn threshold(&self) -> u8 {
        match *self {
            Debounce::SwapBuffer { threshold } | Debounce::ShadowCommit { threshold, .. } => {
                threshold
            }
        }
    }

    pub fn pause_ms(&self) -> u32 {
        match *self {
            Debounce::SwapBuffer { .. } => 0,
            Debounce::ShadowCommit { pause_ms, .. } => pause_ms,
        }
    }
}

/// Matrix cell `[row, col]`.
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Cell(pub usize, pub usize);

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub name: String,
    pub keys: Vec<Vec<String>>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FnKey {
    pub layer: u8,
    pub keycode: String,
}

/// AVR pin, port letter and bit.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct PinId {
    pub port: char,
    pub bit: u8,
}

impl PinId {
    pub fn parse(pin: &str) -> anyhow::Result<Self> {
        let mut chars = pin.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(port @ 'A'..='F'), Some(bit @ '0'..='7'), None) => Ok(Self {
                port,
                bit: bit as u8 - b'0',
            }),
            _ => bail!("invalid pin {pin:?}, expected a port A-F and a bit 0-7 such as \"F4\""),
        }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.port, self.bit)
    }
}

impl ToTokens for PinId {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let port = port_ident(self.port);
        let bit = Literal::u8_unsuffixed(self.bit);
        tokens.append_all(quote! { PinId::new(PortId::#port, #bit) });
    }
}

fn parse_port(port: &str) -> anyhow::Result<char> {
    let mut chars = port.chars();
    match (chars.next(), chars.next()) {
        (Some(port @ 'A'..='F'), None) => Ok(port),
        _ => bail!("invalid port {port:?}, expected a letter A-F"),
    }
}

fn port_ident(port: char) -> Ident {
    Ident::new(&port.to_string(), Span::call_site())
}

fn is_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && syn::parse_str::<Ident>(name).is_ok()
}

#[derive(Debug, PartialEq, Clone)]
pub enum ColumnWiring {
    Port(char),
    Pins(Vec<PinId>),
}

/// One keymap layer resolved to key codes, indexed `[row][col]`.
#[derive(Debug, PartialEq, Clone)]
pub struct LayerTable {
    pub name: String,
    pub keys: Vec<Vec<u8>>,
}

/// A validated board.
#[derive(Debug, PartialEq, Clone)]
pub struct Board {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub row_pins: Vec<PinId>,
    pub columns: ColumnWiring,
    pub debounce: Debounce,
    pub ghost_detection: bool,
    pub layers: Vec<LayerTable>,
    pub fn_layer: [u8; FN_KEYS],
    pub fn_keycode: [u8; FN_KEYS],
}

impl BoardConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let config = serde_json::from_reader(&mut reader)
            .with_context(|| format!("While reading {}", path.display()))?;
        Ok(config)
    }

    pub fn schema() -> RootSchema {
        schema_for!(Self)
    }

    pub fn validate(&self) -> anyhow::Result<Board> {
        ensure!(
            is_module_name(&self.name),
            "board name {:?} is not a lowercase identifier",
            self.name
        );

        let matrix = &self.matrix;
        let (rows, cols) = (matrix.rows, matrix.cols);
        ensure!(
            (1..=MAX_ROWS).contains(&rows),
            "rows must be within 1..={MAX_ROWS}, got {rows}"
        );
        ensure!(
            (1..=MAX_COLS).contains(&cols),
            "cols must be within 1..={MAX_COLS}, got {cols}"
        );

        ensure!(
            matrix.row_pins.len() == rows,
            "expected {rows} row pins, got {}",
            matrix.row_pins.len()
        );
        let row_pins = matrix
            .row_pins
            .iter()
            .enumerate()
            .map(|(row, pin)| PinId::parse(pin).with_context(|| format!("row pin {row}")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let columns = match &matrix.columns {
            Columns::Port(port) => {
                ensure!(
                    cols <= 8,
                    "a column port has 8 lines, {cols} columns need pin wiring"
                );
                let port = parse_port(port)?;
                if let Some(pin) = row_pins.iter().find(|pin| pin.port == port) {
                    bail!("row pin {pin} is on column port {port}");
                }
                ColumnWiring::Port(port)
            }
            Columns::Pins(pins) => {
                ensure!(
                    pins.len() == cols,
                    "expected {cols} column pins, got {}",
                    pins.len()
                );
                let pins = pins
                    .iter()
                    .enumerate()
                    .map(|(col, pin)| PinId::parse(pin).with_context(|| format!("column pin {col}")))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                ColumnWiring::Pins(pins)
            }
        };

        let column_pins = match &columns {
            ColumnWiring::Port(_) => &[][..],
            ColumnWiring::Pins(pins) => pins.as_slice(),
        };
        let mut used = HashSet::new();
        for pin in row_pins.iter().chain(column_pins) {
            ensure!(used.insert(*pin), "pin {pin} is used twice");
        }

        let mut seen = HashSet::new();
        for (i, keys) in self.layout.iter().enumerate() {
            for &Cell(row, col) in keys {
                ensure!(
                    row < rows && col < cols,
                    "layout row {i}: cell [{row}, {col}] is outside the {rows}x{cols} matrix"
                );
                ensure!(
                    seen.insert((row, col)),
                    "layout row {i}: cell [{row}, {col}] is used twice"
                );
            }
        }

        ensure!(!self.layers.is_empty(), "at least one layer is required");
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                self.layer_table(layer)
                    .with_context(|| format!("layer {:?}", layer.name))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        ensure!(
            self.fn_keys.len() == FN_KEYS,
            "expected {FN_KEYS} fn_keys, got {}",
            self.fn_keys.len()
        );
        let mut fn_layer = [0; FN_KEYS];
        let mut fn_keycode = [0; FN_KEYS];
        for (i, fn_key) in self.fn_keys.iter().enumerate() {
            ensure!(
                usize::from(fn_key.layer) < layers.len(),
                "FN{i} switches to layer {}, but only {} layers are defined",
                fn_key.layer,
                layers.len()
            );
            fn_layer[i] = fn_key.layer;
            fn_keycode[i] = keycode::by_name(&fn_key.keycode)
                .with_context(|| format!("FN{i}: unknown key {:?}", fn_key.keycode))?;
        }

        Ok(Board {
            name: self.name.clone(),
            rows,
            cols,
            row_pins,
            columns,
            debounce: matrix.debounce,
            ghost_detection: matrix.ghost_detection,
            layers,
            fn_layer,
            fn_keycode,
        })
    }

    fn layer_table(&self, layer: &Layer) -> anyhow::Result<LayerTable> {
        ensure!(
            layer.keys.len() == self.layout.len(),
            "expected {} rows of keys, got {}",
            self.layout.len(),
            layer.keys.len()
        );

        let mut keys = vec![vec![0; self.matrix.cols]; self.matrix.rows];
        for (i, (cells, names)) in self.layout.iter().zip(&layer.keys).enumerate() {
            ensure!(
                cells.len() == names.len(),
                "row {i}: expected {} keys, got {}",
                cells.len(),
                names.len()
            );
            for (&Cell(row, col), name) in cells.iter().zip(names) {
                keys[row][col] = keycode::by_name(name)
                    .with_context(|| format!("row {i}: unknown key {name:?}"))?;
            }
        }

        Ok(LayerTable {
            name: layer.name.clone(),
            keys,
        })
    }
}

impl Board {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        BoardConfig::from_file(path)?
            .validate()
            .with_context(|| format!("While validating {}", path.display()))
    }

    /// Row word type wide enough for the columns.
    pub fn word(&self) -> &'static str {
        if self.cols <= 8 {
            "u8"
        } else {
            "u16"
        }
    }

    pub fn to_string_pretty(&self) -> anyhow::Result<String> {
        boards_to_string(std::slice::from_ref(self))
    }
}

impl ToTokens for Board {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let module = Ident::new(&self.name, Span::call_site());
        let name = &self.name;
        let rows = Literal::usize_unsuffixed(self.rows);
        let cols = Literal::usize_unsuffixed(self.cols);
        let layer_count = Literal::usize_unsuffixed(self.layers.len());
        let word = Ident::new(self.word(), Span::call_site());

        let (policy, debouncer) = match self.debounce {
            Debounce::SwapBuffer { .. } => (
                quote! { SwapBuffer },
                quote! { crate::debounce::SwapBuffer::new(DEBOUNCE) },
            ),
            Debounce::ShadowCommit { .. } => (
                quote! { ShadowCommit },
                quote! { crate::debounce::ShadowCommit::new(DEBOUNCE, PAUSE_MS) },
            ),
        };
        let threshold = Literal::u8_unsuffixed(self.debounce.threshold());
        let pause_ms = Literal::u32_unsuffixed(self.debounce.pause_ms());
        let ghost_detection = self.ghost_detection;

        let row_pins = &self.row_pins;
        let columns = match &self.columns {
            ColumnWiring::Port(port) => {
                let port = port_ident(*port);
                quote! { ColumnWiring::Port(PortId::#port) }
            }
            ColumnWiring::Pins(pins) => quote! { ColumnWiring::Pins([ #(#pins),* ]) },
        };

        let layer_names = self.layers.iter().map(|layer| &layer.name);
        let table = self.layers.iter().map(|layer| {
            let rows = layer.keys.iter().map(|row| {
                let codes = row.iter().map(|&code| Literal::u8_unsuffixed(code));
                quote! { [ #(#codes),* ] }
            });
            quote! { [ #(#rows),* ] }
        });
        let fn_layer = self.fn_layer.iter().map(|&layer| Literal::u8_unsuffixed(layer));
        let fn_keycode = self.fn_keycode.iter().map(|&code| Literal::u8_unsuffixed(code));

        tokens.append_all(quote! {
            pub mod #module {
                use crate::debounce::Policy;
                use crate::keymap::Keymap;
                use crate::pin::{ColumnWiring, PinId, PortId};

                pub const NAME: &str = #name;
                pub const ROWS: usize = #rows;
                pub const COLS: usize = #cols;
                pub const LAYERS: usize = #layer_count;

                pub type Word = #word;
                pub type Debouncer = crate::debounce::#policy<Word, ROWS>;

                pub const POLICY: Policy = Policy::#policy;
                pub const DEBOUNCE: u8 = #threshold;
                pub const PAUSE_MS: u32 = #pause_ms;
                pub const GHOST_DETECTION: bool = #ghost_detection;

                pub const ROW_PINS: [PinId; ROWS] = [ #(#row_pins),* ];
                pub const COLUMNS: ColumnWiring<COLS> = #columns;
                pub const LAYER_NAMES: [&str; LAYERS] = [ #(#layer_names),* ];

                pub fn debouncer() -> Debouncer {
                    #debouncer
                }

                static TABLE: [[[u8; COLS]; ROWS]; LAYERS] = [ #(#table),* ];

                pub static KEYMAP: Keymap<LAYERS, ROWS, COLS> = Keymap::new(
                    &TABLE,
                    [ #(#fn_layer),* ],
                    [ #(#fn_keycode),* ],
                );
            }
        });
    }
}

/// All boards as the items of one file.
pub fn boards_tokens(boards: &[Board]) -> TokenStream {
    let names = boards.iter().map(|board| &board.name);
    quote! {
        /// Names of the generated board modules.
        pub const BOARDS: &[&str] = &[ #(#names),* ];

        #(#boards)*
    }
}

pub fn boards_to_string(boards: &[Board]) -> anyhow::Result<String> {
    let file = boards_tokens(boards).to_string();
    let parsed = syn::parse_file(&file).context(format!("Failed to parse:\n{}", file))?;
    Ok(format!(
        "// @generated by kinesis-layout, do not edit\n\n{}",
        prettyplease::unparse(&parsed)
    ))
}

/// Validate every board file and write the generated modules to `out`.
pub fn write_boards(paths: &[PathBuf], out: &Path) -> anyhow::Result<()> {
    let boards = paths
        .iter()
        .map(|path| Board::from_file(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut names = HashSet::new();
    for board in &boards {
        ensure!(
            names.insert(&board.name),
            "board {:?} is defined twice",
            board.name
        );
    }

    let code = boards_to_string(&boards)?;
    let mut file = File::create(out).with_context(|| format!("Creating {}", out.display()))?;
    file.write_all(code.as_bytes())?;
    Ok(())
}

pub fn schema_to_string() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&BoardConfig::schema())?)
}
