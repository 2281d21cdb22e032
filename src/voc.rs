//! Pascal VOC annotation parsing.
//!
//! The XML document is first read into a small element tree so that element
//! counts can be checked (a `path` may appear at most once, `size` exactly
//! once, and so on) before the typed [`VocAnnotation`] is built from it.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::utils::basename;

/// A parsed XML element: its tag, its concatenated text and its child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse an XML document and return its root element
    pub fn parse(content: &str, file: &Path) -> Result<Element> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    stack.push(Element::new(name));
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    attach(&mut stack, &mut root, Element::new(name));
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        root.ok_or_else(|| ConvertError::structural(file, "", "document has no root element"))
    }

    /// All direct children with the given tag, in document order
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        self.children.iter().filter(|c| c.name == name).collect()
    }

    /// The single direct child with the given tag.
    ///
    /// Missing and duplicated children are both structural errors.
    pub fn get_and_check(&self, name: &str, file: &Path) -> Result<&Element> {
        let found = self.find_all(name);
        match found.len() {
            1 => Ok(found[0]),
            0 => Err(ConvertError::structural(
                file,
                name,
                format!("Can not find {} in {}.", name, self.name),
            )),
            n => Err(ConvertError::structural(
                file,
                name,
                format!("The size of {} is supposed to be 1, but is {}.", name, n),
            )),
        }
    }

    /// Text content parsed as an integer
    pub fn parse_text<T: std::str::FromStr>(&self, file: &Path) -> Result<T> {
        self.text
            .trim()
            .parse()
            .map_err(|_| ConvertError::InvalidNumber {
                file: file.to_path_buf(),
                element: self.name.clone(),
                value: self.text.clone(),
            })
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Raw VOC bounding box, 1-based inclusive pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub bndbox: VocBox,
}

/// One VOC annotation document reduced to the fields the conversion uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocAnnotation {
    /// Image file name, resolved from `path` or `filename`
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

impl VocAnnotation {
    /// Read and parse a VOC XML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse VOC XML content; `file` is only used in error messages
    pub fn parse(content: &str, file: &Path) -> Result<Self> {
        let root = Element::parse(content, file)?;

        let filename = resolve_filename(&root, file)?;

        let size = root.get_and_check("size", file)?;
        let width = size.get_and_check("width", file)?.parse_text(file)?;
        let height = size.get_and_check("height", file)?.parse_text(file)?;

        let objects = root
            .find_all("object")
            .into_iter()
            .map(|object| parse_object(object, file))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            filename,
            width,
            height,
            objects,
        })
    }
}

/// A single `path` wins over `filename`; more than one `path` is an error.
fn resolve_filename(root: &Element, file: &Path) -> Result<String> {
    let paths = root.find_all("path");
    let filename = match paths.len() {
        0 => root.get_and_check("filename", file)?.text.trim().to_string(),
        1 => basename(paths[0].text.trim()).to_string(),
        n => {
            return Err(ConvertError::structural(
                file,
                "path",
                format!("{} paths found in {}", n, display_name(file)),
            ))
        }
    };

    if filename.is_empty() {
        return Err(ConvertError::structural(
            file,
            if paths.is_empty() { "filename" } else { "path" },
            "image file name is empty",
        ));
    }
    Ok(filename)
}

fn parse_object(object: &Element, file: &Path) -> Result<VocObject> {
    let name = object.get_and_check("name", file)?.text.trim().to_string();
    let bndbox = object.get_and_check("bndbox", file)?;
    let edge = |tag: &str| -> Result<i64> { bndbox.get_and_check(tag, file)?.parse_text(file) };

    Ok(VocObject {
        name,
        bndbox: VocBox {
            xmin: edge("xmin")?,
            ymin: edge("ymin")?,
            xmax: edge("xmax")?,
            ymax: edge("ymax")?,
        },
    })
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<annotation>
    <folder>images</folder>
    <filename>12.jpg</filename>
    <size>
        <width>1024</width>
        <height>768</height>
        <depth>3</depth>
    </size>
    <segmented>0</segmented>
    <object>
        <name>dog</name>
        <pose>Unspecified</pose>
        <bndbox>
            <xmin>48</xmin>
            <ymin>240</ymin>
            <xmax>195</xmax>
            <ymax>371</ymax>
        </bndbox>
    </object>
    <object>
        <name>person</name>
        <bndbox>
            <xmin>8</xmin>
            <ymin>12</ymin>
            <xmax>352</xmax>
            <ymax>498</ymax>
        </bndbox>
    </object>
</annotation>"#;

    fn file() -> &'static Path {
        Path::new("12.xml")
    }

    #[test]
    fn test_parse_sample() {
        let annotation = VocAnnotation::parse(SAMPLE, file()).unwrap();
        assert_eq!(annotation.filename, "12.jpg");
        assert_eq!(annotation.width, 1024);
        assert_eq!(annotation.height, 768);
        assert_eq!(annotation.objects.len(), 2);
        assert_eq!(annotation.objects[0].name, "dog");
        assert_eq!(
            annotation.objects[1].bndbox,
            VocBox {
                xmin: 8,
                ymin: 12,
                xmax: 352,
                ymax: 498
            }
        );
    }

    #[test]
    fn test_path_takes_precedence_over_filename() {
        let xml = SAMPLE.replace(
            "<folder>images</folder>",
            "<path>C:\\data\\images\\99.png</path>",
        );
        let annotation = VocAnnotation::parse(&xml, file()).unwrap();
        assert_eq!(annotation.filename, "99.png");

        let xml = SAMPLE.replace("<folder>images</folder>", "<path>/data/images/5.jpg</path>");
        let annotation = VocAnnotation::parse(&xml, file()).unwrap();
        assert_eq!(annotation.filename, "5.jpg");
    }

    #[test]
    fn test_duplicate_path_is_structural_error() {
        let xml = SAMPLE.replace(
            "<folder>images</folder>",
            "<path>/a/1.jpg</path><path>/b/1.jpg</path>",
        );
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert!(matches!(err, ConvertError::Structural { .. }));
        assert_eq!(err.element(), Some("path"));
        assert!(err.to_string().contains("2 paths found in 12.xml"));
    }

    #[test]
    fn test_missing_filename_without_path() {
        let xml = SAMPLE.replace("<filename>12.jpg</filename>", "");
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert_eq!(err.element(), Some("filename"));
    }

    #[test]
    fn test_missing_size_elements() {
        let xml = SAMPLE.replace("<height>768</height>", "");
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert_eq!(err.element(), Some("height"));
        assert!(err.to_string().contains("Can not find height in size."));

        let xml = SAMPLE.replace("<width>1024</width>", "<width>1024</width><width>2</width>");
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert_eq!(err.element(), Some("width"));
    }

    #[test]
    fn test_missing_bndbox_edge() {
        let xml = SAMPLE.replace("<ymax>371</ymax>", "");
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert!(matches!(err, ConvertError::Structural { .. }));
        assert_eq!(err.element(), Some("ymax"));
    }

    #[test]
    fn test_non_integer_coordinate() {
        let xml = SAMPLE.replace("<xmin>48</xmin>", "<xmin>48.5</xmin>");
        let err = VocAnnotation::parse(&xml, file()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumber { .. }));
        assert_eq!(err.element(), Some("xmin"));
    }

    #[test]
    fn test_no_objects() {
        let xml = r#"<annotation><filename>3.jpg</filename>
            <size><width>10</width><height>10</height></size></annotation>"#;
        let annotation = VocAnnotation::parse(xml, file()).unwrap();
        assert!(annotation.objects.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let err = VocAnnotation::parse("<annotation><size></annotation>", file()).unwrap_err();
        assert!(matches!(err, ConvertError::Xml(_)));
    }

    #[test]
    fn test_element_tree() {
        let root = Element::parse("<a><b>x</b><b/><c><![CDATA[y&z]]></c></a>", file()).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.find_all("b").len(), 2);
        assert_eq!(root.get_and_check("c", file()).unwrap().text, "y&z");
        assert!(root.get_and_check("b", file()).is_err());
    }
}
