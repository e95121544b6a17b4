//! Static font-metric tables for the two standard PDF fonts used by the profile page.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for Helvetica and
//! Helvetica-Bold, so measurement is exact for anything the page can encode.
//! Text is drawn with `WinAnsiEncoding`; `encode_win_ansi` maps a `&str` onto
//! that byte encoding and every width lookup goes through the encoded byte, so
//! what we measure is what the viewer renders.
//!
//! ASCII tables cover 0x20..=0x7E (95 printable characters). Index = byte - 32.

// ────────────────────────────────────────────────────────────────────────────
// Font handle
// ────────────────────────────────────────────────────────────────────────────

/// The two font weights available on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontHandle {
    Regular,
    Bold,
}

impl FontHandle {
    /// PostScript name of the standard Type1 font backing this handle.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontHandle::Regular => "Helvetica",
            FontHandle::Bold => "Helvetica-Bold",
        }
    }

    /// Name under which the font is registered in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontHandle::Regular => "F1",
            FontHandle::Bold => "F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static advance-width table for one font.
///
/// `widths[i]` = width of WinAnsi byte `(i + 32)`, in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    bullet_width: u16,
    single_quote_width: u16,
    double_quote_width: u16,
    /// Fallback for encodable bytes outside the ASCII table without a dedicated entry.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Advance width of a single WinAnsi byte, in 1/1000 em.
    pub fn byte_width(&self, byte: u8) -> u16 {
        match byte {
            0x20..=0x7E => self.widths[(byte - 32) as usize],
            0x95 => self.bullet_width,
            0x91 | 0x92 | 0x82 => self.single_quote_width,
            0x93 | 0x94 | 0x84 => self.double_quote_width,
            0x96 | 0x80 => 556,
            0x97 | 0x85 | 0x89 => 1000,
            // no-break space renders as a regular space
            0xA0 => self.widths[0],
            _ => self.average_char_width,
        }
    }

    /// Measures the rendered width of a string in points at `size`.
    pub fn measure_str(&self, s: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(s)
            .into_iter()
            .map(|b| self.byte_width(b) as u32)
            .sum();
        units as f32 * size / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    bullet_width: 350,
    single_quote_width: 222,
    double_quote_width: 333,
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    bullet_width: 350,
    single_quote_width: 278,
    double_quote_width: 500,
    average_char_width: 611,
};

/// Returns the static metric table for a given font handle.
pub fn get_metrics(font: FontHandle) -> &'static FontMetricTable {
    match font {
        FontHandle::Regular => &HELVETICA_TABLE,
        FontHandle::Bold => &HELVETICA_BOLD_TABLE,
    }
}

/// Width of `text` in points. This is the measure function handed to the line breaker.
pub fn measure_text(text: &str, size: f32, font: FontHandle) -> f32 {
    get_metrics(font).measure_str(text, size)
}

// ────────────────────────────────────────────────────────────────────────────
// WinAnsi encoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes `text` as WinAnsi (CP-1252) bytes. Characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
