//! Builders for the byte fixtures the integration tests share.

#![allow(dead_code)]

pub fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

pub const ASCII: u16 = 2;
pub const SHORT: u16 = 3;
pub const LONG: u16 = 4;
pub const RATIONAL: u16 = 5;
pub const UNDEFINED: u16 = 7;

/// Where an entry's value comes from.
pub enum Data {
    /// Already-encoded little-endian bytes.
    Bytes(Vec<u8>),

    /// The offset of another IFD, by its index in the list given to
    /// [`tiff`].
    Ifd(usize),
}

pub struct Entry {
    pub tag: u16,
    pub ty: u16,
    pub count: u32,
    pub data: Data,
}

impl Entry {
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Self {
            tag,
            ty: ASCII,
            count: bytes.len() as u32,
            data: Data::Bytes(bytes),
        }
    }

    pub fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            ty: SHORT,
            count: 1,
            data: Data::Bytes(value.to_le_bytes().to_vec()),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            ty: LONG,
            count: 1,
            data: Data::Bytes(value.to_le_bytes().to_vec()),
        }
    }

    pub fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let mut bytes = Vec::new();
        for (numerator, denominator) in values {
            bytes.extend_from_slice(&numerator.to_le_bytes());
            bytes.extend_from_slice(&denominator.to_le_bytes());
        }
        Self {
            tag,
            ty: RATIONAL,
            count: values.len() as u32,
            data: Data::Bytes(bytes),
        }
    }

    pub fn undefined(tag: u16, bytes: &[u8]) -> Self {
        Self {
            tag,
            ty: UNDEFINED,
            count: bytes.len() as u32,
            data: Data::Bytes(bytes.to_vec()),
        }
    }

    pub fn pointer(tag: u16, ifd: usize) -> Self {
        Self {
            tag,
            ty: LONG,
            count: 1,
            data: Data::Ifd(ifd),
        }
    }

    /// How many bytes this entry stores after its IFD.
    fn out_of_line_len(&self) -> usize {
        match &self.data {
            Data::Bytes(b) if b.len() > 4 => b.len(),
            _ => 0,
        }
    }
}

pub struct Ifd {
    pub entries: Vec<Entry>,

    /// The next IFD in the chain, by index.
    pub next: Option<usize>,
}

/// Builds a little-endian TIFF body. `ifds[0]` is IFD 0.
///
/// IFDs are laid out in order, each one followed by its out-of-line values.
pub fn tiff(ifds: &[Ifd]) -> Vec<u8> {
    let mut offsets = Vec::new();
    let mut at = 8;
    for ifd in ifds {
        offsets.push(at);
        at += 2
            + ifd.entries.len() * 12
            + 4
            + ifd.entries.iter().map(Entry::out_of_line_len).sum::<usize>();
    }

    let mut body = Vec::new();
    body.extend_from_slice(b"II\x2A\x00\x08\x00\x00\x00");
    for (ifd, &start) in ifds.iter().zip(&offsets) {
        assert_eq!(body.len(), start);

        let mut data_at = start + 2 + ifd.entries.len() * 12 + 4;
        let mut data = Vec::new();

        body.extend_from_slice(&(ifd.entries.len() as u16).to_le_bytes());
        for entry in &ifd.entries {
            body.extend_from_slice(&entry.tag.to_le_bytes());
            body.extend_from_slice(&entry.ty.to_le_bytes());
            body.extend_from_slice(&entry.count.to_le_bytes());
            match &entry.data {
                Data::Ifd(i) => body.extend_from_slice(&(offsets[*i] as u32).to_le_bytes()),
                Data::Bytes(b) if b.len() <= 4 => {
                    let mut inline = [0_u8; 4];
                    inline[..b.len()].copy_from_slice(b);
                    body.extend_from_slice(&inline);
                }
                Data::Bytes(b) => {
                    body.extend_from_slice(&(data_at as u32).to_le_bytes());
                    data.extend_from_slice(b);
                    data_at += b.len();
                }
            }
        }

        let next = ifd.next.map_or(0, |i| offsets[i] as u32);
        body.extend_from_slice(&next.to_le_bytes());
        body.extend_from_slice(&data);
    }
    body
}

/// Wraps a payload in an APP1 segment.
pub fn app1(payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xE1];
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

pub fn exif_app1(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    app1(&payload)
}

pub fn xmp_app1(packet: &str) -> Vec<u8> {
    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(packet.as_bytes());
    app1(&payload)
}

/// Wraps IPTC datasets in a Photoshop APP13 segment.
pub fn iptc_app13(datasets: &[(u8, &[u8])]) -> Vec<u8> {
    let mut data = Vec::new();
    for (id, value) in datasets {
        data.extend_from_slice(&[0x1C, 0x02, *id]);
        data.extend_from_slice(&(value.len() as u16).to_be_bytes());
        data.extend_from_slice(value);
    }

    let mut payload = b"Photoshop 3.0\0".to_vec();
    payload.extend_from_slice(b"8BIM\x04\x04");
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    payload.extend_from_slice(&(data.len() as u16).to_be_bytes());
    payload.extend_from_slice(&data);

    let mut bytes = vec![0xFF, 0xED];
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(&payload);
    bytes
}

/// Puts segments between the start-of-image marker and some fake scan data.
pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    for segment in segments {
        bytes.extend_from_slice(segment);
    }
    bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
    bytes.extend_from_slice(&[0x55; 32]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}
