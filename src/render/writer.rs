// src/render/writer.rs
//! A buffering PDF document writer.
//!
//! Objects are accumulated in an id-ordered table and serialized in one
//! pass at the end, followed by the cross-reference table and trailer. Ids
//! are allocated densely, so the xref is a single contiguous section.

use lopdf::{Dictionary, Object, ObjectId, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Write};

pub(crate) struct DocWriter {
    objects: BTreeMap<u32, Object>,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
}

impl DocWriter {
    pub fn new() -> Self {
        DocWriter {
            objects: BTreeMap::new(),
            max_id: 3,
            resources_id: (1, 0),
            pages_id: (2, 0),
            catalog_id: (3, 0),
        }
    }

    /// Allocate an id without providing the object yet. The object must be
    /// supplied via [`DocWriter::put`] before [`DocWriter::finish`].
    pub fn reserve(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn add(&mut self, object: Object) -> ObjectId {
        let id = self.reserve();
        self.objects.insert(id.0, object);
        id
    }

    pub fn put(&mut self, id: ObjectId, object: Object) {
        self.objects.insert(id.0, object);
    }

    /// Serialize the document: header, objects, pages tree, catalog, xref
    /// and trailer.
    pub fn finish(
        mut self,
        page_ids: Vec<ObjectId>,
        outline_root_id: Option<ObjectId>,
        info_id: Option<ObjectId>,
    ) -> io::Result<Vec<u8>> {
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => page_ids.len() as i64,
        };
        self.put(self.pages_id, pages_dict.into());

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if let Some(outline_id) = outline_root_id {
            catalog.set("Outlines", outline_id);
            catalog.set("PageMode", "UseOutlines");
        }
        self.put(self.catalog_id, catalog.into());

        let mut buf: Vec<u8> = Vec::new();
        buf.write_all(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n")?;

        let mut offsets: BTreeMap<u32, usize> = BTreeMap::new();
        for (&id, object) in &self.objects {
            offsets.insert(id, buf.len());
            write!(buf, "{} 0 obj\n", id)?;
            write_object(&mut buf, object)?;
            buf.write_all(b"\nendobj\n")?;
        }

        let xref_start = buf.len();
        writeln!(buf, "xref")?;
        writeln!(buf, "0 {}", self.max_id + 1)?;
        writeln!(buf, "0000000000 65535 f ")?;
        for id in 1..=self.max_id {
            match offsets.get(&id) {
                Some(offset) => writeln!(buf, "{:010} 00000 n ", offset)?,
                // A reserved id that never received an object.
                None => writeln!(buf, "0000000000 65535 f ")?,
            }
        }

        let mut trailer = dictionary! {
            "Size" => (self.max_id + 1) as i64,
            "Root" => self.catalog_id,
        };
        if let Some(info_id) = info_id {
            trailer.set("Info", info_id);
        }
        writeln!(buf, "trailer")?;
        write_dictionary(&mut buf, &trailer)?;
        writeln!(buf, "\nstartxref")?;
        writeln!(buf, "{}", xref_start)?;
        write!(buf, "%%EOF")?;
        Ok(buf)
    }
}

fn write_object(out: &mut Vec<u8>, object: &Object) -> io::Result<()> {
    match object {
        Object::Null => out.write_all(b"null"),
        Object::Boolean(b) => out.write_all(if *b { b"true" } else { b"false" }),
        Object::Integer(i) => write!(out, "{}", i),
        Object::Real(r) => write!(out, "{:.3}", r),
        Object::Name(n) => {
            out.write_all(b"/")?;
            out.write_all(n)
        }
        Object::String(s, format) => match format {
            StringFormat::Literal => {
                out.write_all(b"(")?;
                for &byte in s {
                    if byte == b'(' || byte == b')' || byte == b'\\' {
                        out.write_all(b"\\")?;
                    }
                    out.write_all(&[byte])?;
                }
                out.write_all(b")")
            }
            StringFormat::Hexadecimal => {
                out.write_all(b"<")?;
                for byte in s {
                    write!(out, "{:02X}", byte)?;
                }
                out.write_all(b">")
            }
        },
        Object::Array(items) => {
            out.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_all(b" ")?;
                }
                write_object(out, item)?;
            }
            out.write_all(b"]")
        }
        Object::Dictionary(dict) => write_dictionary(out, dict),
        Object::Stream(stream) => {
            let mut dict = stream.dict.clone();
            dict.set("Length", stream.content.len() as i64);
            write_dictionary(out, &dict)?;
            out.write_all(b"\nstream\n")?;
            out.write_all(&stream.content)?;
            out.write_all(b"\nendstream")
        }
        Object::Reference(id) => write!(out, "{} {} R", id.0, id.1),
    }
}

fn write_dictionary(out: &mut Vec<u8>, dict: &Dictionary) -> io::Result<()> {
    out.write_all(b"<<")?;
    for (key, value) in dict.iter() {
        out.write_all(b"/")?;
        out.write_all(key)?;
        out.write_all(b" ")?;
        write_object(out, value)?;
        out.write_all(b" ")?;
    }
    out.write_all(b">>")
}
