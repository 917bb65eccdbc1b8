// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version metadata of Windows executables
//!
//! Reads the `FileVersion` string of the `VS_VERSIONINFO` resource without
//! running the file. When the string table has no `FileVersion`, the numeric
//! file version of `VS_FIXEDFILEINFO` is used instead ("major.minor.build.revision").
//!
//! Every offset is bounds-checked: a truncated or hostile file yields `None`,
//! never a panic.

const RT_VERSION: u32 = 16;
const SUBDIRECTORY_FLAG: u32 = 0x8000_0000;
const FIXED_FILE_INFO_SIGNATURE: u32 = 0xFEEF_04BD;
const PE32_MAGIC: u16 = 0x10b;
const PE32_PLUS_MAGIC: u16 = 0x20b;
const RESOURCE_DIRECTORY_INDEX: usize = 2;

/// Type of a `VS_VERSIONINFO` block holding UTF-16 text
const TEXT_BLOCK: u16 = 1;

fn u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

/// Section mapping from virtual addresses to file offsets
struct Section {
    virtual_address: usize,
    size: usize,
    raw_offset: usize,
}

/// Extract the file version of a PE image
///
/// # Returns
/// `Some(version)` if the image carries a version resource, `None` for
/// anything else, including files that are not PE images at all
#[must_use]
pub fn read_file_version(image: &[u8]) -> Option<String> {
    let info = version_resource(image)?;
    file_version_string(info).or_else(|| fixed_file_version(info))
}

fn version_resource(image: &[u8]) -> Option<&[u8]> {
    if image.get(..2)? != b"MZ" {
        return None;
    }
    let pe = u32_at(image, 0x3c)? as usize;
    if image.get(pe..pe.checked_add(4)?)? != b"PE\0\0" {
        return None;
    }

    let coff = pe + 4;
    let section_count = usize::from(u16_at(image, coff + 2)?);
    let optional_size = usize::from(u16_at(image, coff + 16)?);
    let optional = coff + 20;

    let data_directories = match u16_at(image, optional)? {
        PE32_MAGIC => optional + 96,
        PE32_PLUS_MAGIC => optional + 112,
        _ => return None,
    };
    let directory_count = u32_at(image, data_directories - 4)? as usize;
    if directory_count <= RESOURCE_DIRECTORY_INDEX {
        return None;
    }
    let resource_rva = u32_at(image, data_directories + RESOURCE_DIRECTORY_INDEX * 8)? as usize;
    if resource_rva == 0 {
        return None;
    }

    let section_table = optional + optional_size;
    let sections = (0..section_count)
        .map(|i| {
            let header = section_table + i * 40;
            let virtual_size = u32_at(image, header + 8)? as usize;
            let virtual_address = u32_at(image, header + 12)? as usize;
            let raw_size = u32_at(image, header + 16)? as usize;
            let raw_offset = u32_at(image, header + 20)? as usize;
            Some(Section {
                virtual_address,
                size: virtual_size.max(raw_size),
                raw_offset,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    let to_offset = |rva: usize| {
        sections
            .iter()
            .find(|s| rva >= s.virtual_address && rva - s.virtual_address < s.size)
            .map(|s| rva - s.virtual_address + s.raw_offset)
    };

    let root = to_offset(resource_rva)?;

    // Type level: find RT_VERSION, then take the first name and language.
    let mut node = directory_entries(image, root)?
        .find(|&(name, _)| name == RT_VERSION)
        .map(|(_, target)| target)?;
    for _ in 0..2 {
        if node & SUBDIRECTORY_FLAG == 0 {
            break;
        }
        let directory = root.checked_add((node & !SUBDIRECTORY_FLAG) as usize)?;
        node = directory_entries(image, directory)?.next().map(|(_, target)| target)?;
    }
    if node & SUBDIRECTORY_FLAG != 0 {
        return None;
    }

    let data_entry = root.checked_add(node as usize)?;
    let data_rva = u32_at(image, data_entry)? as usize;
    let data_size = u32_at(image, data_entry + 4)? as usize;
    let start = to_offset(data_rva)?;
    image.get(start..start.checked_add(data_size)?)
}

/// `(name, target)` pairs of a resource directory
fn directory_entries(
    image: &[u8],
    directory: usize,
) -> Option<impl Iterator<Item = (u32, u32)> + '_> {
    let named = usize::from(u16_at(image, directory + 12)?);
    let ids = usize::from(u16_at(image, directory + 14)?);
    Some((0..named + ids).map_while(move |i| {
        let entry = directory + 16 + i * 8;
        Some((u32_at(image, entry)?, u32_at(image, entry + 4)?))
    }))
}

/// One node of the `VS_VERSIONINFO` tree
struct Block<'a> {
    key: String,
    kind: u16,
    value: &'a [u8],
    children: usize,
    end: usize,
}

fn read_block(info: &[u8], offset: usize, limit: usize) -> Option<Block<'_>> {
    let length = usize::from(u16_at(info, offset)?);
    let value_length = usize::from(u16_at(info, offset + 2)?);
    let kind = u16_at(info, offset + 4)?;
    if length < 6 {
        return None;
    }
    let end = (offset + length).min(limit);

    let mut cursor = offset + 6;
    let mut key = Vec::new();
    while cursor + 2 <= end {
        let unit = u16_at(info, cursor)?;
        cursor += 2;
        if unit == 0 {
            break;
        }
        key.push(unit);
    }

    let value_start = align4(cursor).min(end);
    let value_bytes = if kind == TEXT_BLOCK {
        value_length * 2
    } else {
        value_length
    };
    let value_end = (value_start + value_bytes).min(end);

    Some(Block {
        key: String::from_utf16_lossy(&key),
        kind,
        value: info.get(value_start..value_end)?,
        children: align4(value_start + value_bytes),
        end,
    })
}

fn find_string(info: &[u8], offset: usize, limit: usize, wanted: &str) -> Option<String> {
    let block = read_block(info, offset, limit)?;
    if block.kind == TEXT_BLOCK && block.key == wanted {
        let units: Vec<u16> = block
            .value
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .take_while(|&unit| unit != 0)
            .collect();
        let text = String::from_utf16_lossy(&units).trim().to_string();
        return (!text.is_empty()).then_some(text);
    }

    let mut child = block.children;
    while child < block.end {
        if let Some(found) = find_string(info, child, block.end, wanted) {
            return Some(found);
        }
        let length = usize::from(u16_at(info, child)?);
        if length == 0 {
            break;
        }
        child = align4(child + length);
    }
    None
}

fn file_version_string(info: &[u8]) -> Option<String> {
    find_string(info, 0, info.len(), "FileVersion")
}

fn fixed_file_version(info: &[u8]) -> Option<String> {
    let root = read_block(info, 0, info.len())?;
    if root.key != "VS_VERSION_INFO" || u32_at(root.value, 0)? != FIXED_FILE_INFO_SIGNATURE {
        return None;
    }
    let most = u32_at(root.value, 8)?;
    let least = u32_at(root.value, 12)?;
    Some(format!(
        "{}.{}.{}.{}",
        most >> 16,
        most & 0xffff,
        least >> 16,
        least & 0xffff
    ))
}

/// Builders for minimal PE images with a version resource
#[cfg(test)]
pub(crate) mod fixture {
    fn utf16z(text: &str) -> Vec<u8> {
        let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    fn pad4(bytes: &mut Vec<u8>) {
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }
    }

    fn block(key: &str, kind: u16, value: &[u8], children: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(&kind.to_le_bytes());
        bytes.extend(utf16z(key));
        pad4(&mut bytes);
        bytes.extend_from_slice(value);
        if !children.is_empty() {
            pad4(&mut bytes);
            bytes.extend_from_slice(children);
        }
        let value_length = if kind == 1 { value.len() / 2 } else { value.len() };
        let length = bytes.len() as u16;
        bytes[0..2].copy_from_slice(&length.to_le_bytes());
        bytes[2..4].copy_from_slice(&(value_length as u16).to_le_bytes());
        bytes
    }

    /// `VS_VERSIONINFO` with an optional `FileVersion` string and a fixed version
    pub(crate) fn version_info(file_version: Option<&str>, fixed: [u16; 4]) -> Vec<u8> {
        let most = (u32::from(fixed[0]) << 16) | u32::from(fixed[1]);
        let least = (u32::from(fixed[2]) << 16) | u32::from(fixed[3]);
        let fixed_info: Vec<u8> = [
            0xFEEF_04BD,
            0x0001_0000,
            most,
            least,
            most,
            least,
            0x3f,
            0,
            4,
            1,
            0,
            0,
            0,
        ]
        .iter()
        .flat_map(|word: &u32| word.to_le_bytes())
        .collect();

        let mut children = Vec::new();
        if let Some(version) = file_version {
            let mut string = block("FileVersion", 1, &utf16z(version), &[]);
            pad4(&mut string);
            let mut table = block("040904b0", 1, &[], &string);
            pad4(&mut table);
            children = block("StringFileInfo", 1, &[], &table);
            pad4(&mut children);
        }
        block("VS_VERSION_INFO", 0, &fixed_info, &children)
    }

    fn put_u16(bytes: &mut [u8], offset: usize, value: u16) {
        bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
        bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// PE image with a single `.rsrc` section holding `info` as its version resource
    pub(crate) fn pe_image(info: &[u8], pe32_plus: bool) -> Vec<u8> {
        const PE_OFFSET: usize = 0x40;
        const RAW_OFFSET: u32 = 0x200;
        const SECTION_RVA: u32 = 0x1000;

        let optional_size: usize = if pe32_plus { 240 } else { 224 };
        let mut headers = vec![0u8; RAW_OFFSET as usize];
        headers[0..2].copy_from_slice(b"MZ");
        put_u32(&mut headers, 0x3c, PE_OFFSET as u32);
        headers[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");

        let coff = PE_OFFSET + 4;
        put_u16(&mut headers, coff, if pe32_plus { 0x8664 } else { 0x14c });
        put_u16(&mut headers, coff + 2, 1);
        put_u16(&mut headers, coff + 16, optional_size as u16);
        put_u16(&mut headers, coff + 18, 0x22);

        let optional = coff + 20;
        put_u16(&mut headers, optional, if pe32_plus { 0x20b } else { 0x10b });
        let directories = optional + if pe32_plus { 112 } else { 96 };
        put_u32(&mut headers, directories - 4, 16);

        // Resource tree: type (RT_VERSION) -> name (1) -> language (0x409) -> data entry
        let mut rsrc = Vec::new();
        for (id, target) in [(16u32, 0x8000_0018u32), (1, 0x8000_0030), (0x409, 0x48)] {
            rsrc.extend_from_slice(&[0u8; 14]);
            rsrc.extend_from_slice(&1u16.to_le_bytes());
            rsrc.extend_from_slice(&id.to_le_bytes());
            rsrc.extend_from_slice(&target.to_le_bytes());
        }
        rsrc.extend_from_slice(&(SECTION_RVA + 0x58).to_le_bytes());
        rsrc.extend_from_slice(&(info.len() as u32).to_le_bytes());
        rsrc.extend_from_slice(&[0u8; 8]);
        rsrc.extend_from_slice(info);
        pad4(&mut rsrc);

        let section = optional + optional_size;
        headers[section..section + 8].copy_from_slice(b".rsrc\0\0\0");
        put_u32(&mut headers, section + 8, rsrc.len() as u32);
        put_u32(&mut headers, section + 12, SECTION_RVA);
        put_u32(&mut headers, section + 16, rsrc.len() as u32);
        put_u32(&mut headers, section + 20, RAW_OFFSET);
        put_u32(&mut headers, directories + 16, SECTION_RVA);
        put_u32(&mut headers, directories + 20, rsrc.len() as u32);

        headers.extend(rsrc);
        headers
    }
}
