use std::fs;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::atlas::{Descriptor, percent};
use crate::error::IcropperError;

const DESCRIPTOR_VERSION: &str = "0.1";
const DESCRIPTOR_COMMENT: &str = " icropper layout descriptor ";

/// Render the layout descriptor as an indented XML document
pub fn render_descriptor(descriptor: &Descriptor) -> Result<Vec<u8>, IcropperError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(&mut writer, Event::Comment(BytesText::new(DESCRIPTOR_COMMENT)))?;

    let root = BytesStart::new("icropper").with_attributes([("version", DESCRIPTOR_VERSION)]);
    write(&mut writer, Event::Start(root))?;

    // Overall usage
    write(&mut writer, Event::Start(BytesStart::new("infos")))?;
    let usage = percent(descriptor.usage);
    let info = BytesStart::new("info").with_attributes([("usage", usage.as_str())]);
    write(&mut writer, Event::Empty(info))?;
    write(&mut writer, Event::End(BytesEnd::new("infos")))?;

    let mut textures = BytesStart::new("textures");
    textures.push_attribute(("size", descriptor.textures.len().to_string().as_str()));
    write(&mut writer, Event::Start(textures))?;
    for texture in &descriptor.textures {
        let mut node = BytesStart::new("texture");
        node.push_attribute(("id", texture.id.to_string().as_str()));
        node.push_attribute(("file", texture.file.as_str()));
        node.push_attribute(("usage", percent(texture.usage).as_str()));
        write(&mut writer, Event::Empty(node))?;
    }
    write(&mut writer, Event::End(BytesEnd::new("textures")))?;

    let mut images = BytesStart::new("images");
    images.push_attribute(("size", descriptor.images.len().to_string().as_str()));
    images.push_attribute((
        "axis_y",
        if descriptor.flip_axis_y {
            "ascent"
        } else {
            "descent"
        },
    ));
    write(&mut writer, Event::Start(images))?;

    for image in &descriptor.images {
        let mut node = BytesStart::new("image");
        node.push_attribute(("name", image.name.as_str()));
        node.push_attribute(("width", image.width.to_string().as_str()));
        node.push_attribute(("height", image.height.to_string().as_str()));
        if let Some(scale) = image.scale {
            node.push_attribute(("scale", scale.to_string().as_str()));
        }
        node.push_attribute(("size", image.rects.len().to_string().as_str()));
        write(&mut writer, Event::Start(node))?;

        for rect in &image.rects {
            let mut node = BytesStart::new("rect");
            for (key, value) in [
                ("id", rect.texture_id.to_string()),
                ("texture_x", rect.texture_x.to_string()),
                ("texture_y", rect.texture_y.to_string()),
                ("image_x", rect.image_x.to_string()),
                ("image_y", rect.image_y.to_string()),
                ("width", rect.width.to_string()),
                ("height", rect.height.to_string()),
            ] {
                node.push_attribute((key, value.as_str()));
            }
            if rect.rotated {
                node.push_attribute(("rotate", "true"));
            }
            write(&mut writer, Event::Empty(node))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("image")))?;
    }
    write(&mut writer, Event::End(BytesEnd::new("images")))?;

    write(&mut writer, Event::Empty(BytesStart::new("actions")))?;
    write(&mut writer, Event::End(BytesEnd::new("icropper")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Render the descriptor and write it to `path`, creating parent directories
pub fn write_xml(descriptor: &Descriptor, path: &Path) -> Result<(), IcropperError> {
    let bytes = render_descriptor(descriptor)?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| IcropperError::OutputWrite {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, bytes).map_err(|e| IcropperError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), IcropperError> {
    writer
        .write_event(event)
        .map_err(|e| IcropperError::Xml(e.to_string()))
}
