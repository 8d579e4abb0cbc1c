//! darktable XMP sidecar rendering.
//!
//! Only the two subject lists carry photo data. Everything else is the
//! minimal boilerplate darktable 1.0 needs to accept the file on import.

use std::fs;
use std::path::Path;

use crate::error::SidecarError;
use crate::hierarchy::ResolvedTags;

const XPACKET_BEGIN: &str = "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n";

const XMP_HEADER: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="XMP Core 4.4.0-Exiv2">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:xmp="http://ns.adobe.com/xap/1.0/"
    xmlns:darktable="http://darktable.sf.net/"
    xmlns:lr="http://ns.adobe.com/lightroom/1.0/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
   xmp:Rating="1"
   darktable:xmp_version="1"
   darktable:raw_params="0">
   <darktable:colorlabels>
    <rdf:Seq/>
   </darktable:colorlabels>
   <darktable:history_modversion>
    <rdf:Bag/>
   </darktable:history_modversion>
   <darktable:history_enabled>
    <rdf:Bag/>
   </darktable:history_enabled>
   <darktable:history_operation>
    <rdf:Bag/>
   </darktable:history_operation>
   <darktable:history_params>
    <rdf:Bag/>
   </darktable:history_params>
   <darktable:blendop_params>
    <rdf:Bag/>
   </darktable:blendop_params>
"#;

const XMP_FOOTER: &str = r#"  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>
"#;

/// Render the full XMP document for a photo.
pub fn render(tags: &ResolvedTags) -> String {
    let mut xmp = String::from(XPACKET_BEGIN);
    xmp.push_str(XMP_HEADER);
    push_seq(&mut xmp, "lr:hierarchicalSubject", &tags.hierarchical);
    push_seq(&mut xmp, "dc:subject", &tags.simple);
    xmp.push_str(XMP_FOOTER);
    xmp
}

/// Write the sidecar in a single call, replacing any existing file.
pub fn write_sidecar(path: &Path, tags: &ResolvedTags) -> Result<(), SidecarError> {
    fs::write(path, render(tags)).map_err(|source| SidecarError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn push_seq(xmp: &mut String, element: &str, items: &[String]) {
    xmp.push_str(&format!("   <{}>\n    <rdf:Seq>\n", element));
    for item in items {
        xmp.push_str(&format!("     <rdf:li>{}</rdf:li>\n", xml_escape(item)));
    }
    xmp.push_str(&format!("    </rdf:Seq>\n   </{}>\n", element));
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
