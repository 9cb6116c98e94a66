//! Builders for minimal but well-formed .NET PE images.
//!
//! The constructed image is a PE32 with one `.text` section at RVA 0x2000
//! holding the COR20 header, the metadata root, a `#~` stream and a
//! `#Strings` heap. Table content models a tiny application: two methods
//! defined on `MyApp.Program`, two managed imports and one P/Invoke.

/// Incrementally builds a `#Strings` heap, returning the offset of each
/// added string.
pub struct StringsBuilder {
    data: Vec<u8>,
}

impl StringsBuilder {
    pub fn new() -> StringsBuilder {
        StringsBuilder { data: vec![0] }
    }

    pub fn add(&mut self, value: &str) -> u16 {
        let offset = self.data.len() as u16;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        offset
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

fn push_u16(data: &mut Vec<u8>, value: u16) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(data: &mut Vec<u8>, value: u32) {
    data.extend_from_slice(&value.to_le_bytes());
}

/// Builds the `#~` stream and its matching `#Strings` heap.
fn build_tables() -> (Vec<u8>, Vec<u8>) {
    let mut strings = StringsBuilder::new();
    let module_name = strings.add("MyModule");
    let ns_system_io = strings.add("System.IO");
    let ty_file = strings.add("File");
    let ns_system = strings.add("System");
    let ty_console = strings.add("Console");
    let ty_module = strings.add("<Module>");
    let ns_myapp = strings.add("MyApp");
    let ty_program = strings.add("Program");
    let m_main = strings.add("Main");
    let m_create_file = strings.add("CreateFile");
    let m_open_read = strings.add("OpenRead");
    let m_write_line = strings.add("WriteLine");
    let mod_kernel32 = strings.add("kernel32.dll");

    let mut tables = Vec::new();

    // Header: reserved, version 2.0, heap sizes, reserved.
    push_u32(&mut tables, 0);
    tables.push(2);
    tables.push(0);
    tables.push(0); // all heaps small
    tables.push(1);

    // Module, TypeRef, TypeDef, MethodDef, MemberRef, ModuleRef, ImplMap.
    let valid: u64 = (1 << 0) | (1 << 1) | (1 << 2) | (1 << 6) | (1 << 10) | (1 << 26) | (1 << 28);
    tables.extend_from_slice(&valid.to_le_bytes());
    tables.extend_from_slice(&0_u64.to_le_bytes()); // sorted

    for rows in [1_u32, 2, 2, 2, 2, 1, 1] {
        push_u32(&mut tables, rows);
    }

    // Module: generation, name, mvid, encid, encbaseid.
    push_u16(&mut tables, 0);
    push_u16(&mut tables, module_name);
    push_u16(&mut tables, 1);
    push_u16(&mut tables, 0);
    push_u16(&mut tables, 0);

    // TypeRef 1: System.IO.File, scope AssemblyRef row 1.
    push_u16(&mut tables, (1 << 2) | 2);
    push_u16(&mut tables, ty_file);
    push_u16(&mut tables, ns_system_io);
    // TypeRef 2: System.Console.
    push_u16(&mut tables, (1 << 2) | 2);
    push_u16(&mut tables, ty_console);
    push_u16(&mut tables, ns_system);

    // TypeDef 1: <Module>, no methods.
    push_u32(&mut tables, 0);
    push_u16(&mut tables, ty_module);
    push_u16(&mut tables, 0);
    push_u16(&mut tables, 0); // extends: null
    push_u16(&mut tables, 1); // field_list
    push_u16(&mut tables, 1); // method_list
    // TypeDef 2: MyApp.Program, owns MethodDef 1..=2.
    push_u32(&mut tables, 0x0010_0001);
    push_u16(&mut tables, ty_program);
    push_u16(&mut tables, ns_myapp);
    push_u16(&mut tables, (1 << 2) | 1); // extends TypeRef row 1
    push_u16(&mut tables, 1);
    push_u16(&mut tables, 1);

    // MethodDef 1: Main.
    push_u32(&mut tables, 0x2050);
    push_u16(&mut tables, 0);
    push_u16(&mut tables, 0x0096);
    push_u16(&mut tables, m_main);
    push_u16(&mut tables, 1);
    push_u16(&mut tables, 1);
    // MethodDef 2: CreateFile, P/Invoke stub.
    push_u32(&mut tables, 0);
    push_u16(&mut tables, 0);
    push_u16(&mut tables, 0x2096);
    push_u16(&mut tables, m_create_file);
    push_u16(&mut tables, 1);
    push_u16(&mut tables, 1);

    // MemberRef 1: System.IO.File::OpenRead.
    push_u16(&mut tables, (1 << 3) | 1);
    push_u16(&mut tables, m_open_read);
    push_u16(&mut tables, 1);
    // MemberRef 2: System.Console::WriteLine.
    push_u16(&mut tables, (2 << 3) | 1);
    push_u16(&mut tables, m_write_line);
    push_u16(&mut tables, 1);

    // ModuleRef 1: kernel32.dll.
    push_u16(&mut tables, mod_kernel32);

    // ImplMap 1: MethodDef 2 -> kernel32.dll!CreateFile.
    push_u16(&mut tables, 0x0100);
    push_u16(&mut tables, (2 << 1) | 1);
    push_u16(&mut tables, m_create_file);
    push_u16(&mut tables, 1);

    (tables, strings.finish())
}

/// Wraps stream contents in a metadata root with a `#~` and a `#Strings`
/// stream header.
fn build_metadata(tables: &[u8], strings: &[u8]) -> Vec<u8> {
    let mut meta = Vec::new();
    push_u32(&mut meta, 0x424A_5342); // BSJB
    push_u16(&mut meta, 1);
    push_u16(&mut meta, 1);
    push_u32(&mut meta, 0);
    push_u32(&mut meta, 12);
    meta.extend_from_slice(b"v4.0.30319\0\0");
    push_u16(&mut meta, 0);
    push_u16(&mut meta, 2);

    // Directory: 12 bytes for "#~", 20 for "#Strings", content at 64.
    let tables_offset = 32 + 12 + 20;
    push_u32(&mut meta, tables_offset);
    push_u32(&mut meta, tables.len() as u32);
    meta.extend_from_slice(b"#~\0\0");

    push_u32(&mut meta, tables_offset + tables.len() as u32);
    push_u32(&mut meta, strings.len() as u32);
    meta.extend_from_slice(b"#Strings\0\0\0\0");

    assert_eq!(meta.len() as u32, tables_offset);
    meta.extend_from_slice(tables);
    meta.extend_from_slice(strings);
    meta
}

/// Builds a `#~` stream holding only a Module row, for binaries without
/// any type or import tables.
fn build_tables_module_only() -> (Vec<u8>, Vec<u8>) {
    let mut strings = StringsBuilder::new();
    let module_name = strings.add("Empty");

    let mut tables = Vec::new();
    push_u32(&mut tables, 0);
    tables.push(2);
    tables.push(0);
    tables.push(0);
    tables.push(1);
    tables.extend_from_slice(&1_u64.to_le_bytes()); // Module only
    tables.extend_from_slice(&0_u64.to_le_bytes());
    push_u32(&mut tables, 1);

    push_u16(&mut tables, 0);
    push_u16(&mut tables, module_name);
    push_u16(&mut tables, 1);
    push_u16(&mut tables, 0);
    push_u16(&mut tables, 0);

    (tables, strings.finish())
}

/// Builds a complete PE32 .NET image with the given COR20 flags.
///
/// Layout: headers in the first 0x200 bytes, one `.text` section at file
/// offset 0x200 / RVA 0x2000 holding the COR20 header followed by the
/// metadata.
pub fn build_dotnet_pe(cor_flags: u32) -> Vec<u8> {
    let (tables, strings) = build_tables();
    wrap_metadata(&build_metadata(&tables, &strings), cor_flags)
}

/// Like [`build_dotnet_pe`], but with no TypeDef, TypeRef or import tables.
pub fn build_dotnet_pe_no_types(cor_flags: u32) -> Vec<u8> {
    let (tables, strings) = build_tables_module_only();
    wrap_metadata(&build_metadata(&tables, &strings), cor_flags)
}

fn wrap_metadata(metadata: &[u8], cor_flags: u32) -> Vec<u8> {
    let mut image = vec![0_u8; 0x200];

    // DOS header.
    image[0] = b'M';
    image[1] = b'Z';
    image[0x3C..0x40].copy_from_slice(&0x80_u32.to_le_bytes());

    // PE signature.
    image[0x80..0x84].copy_from_slice(b"PE\0\0");

    // COFF header.
    image[0x84..0x86].copy_from_slice(&0x014C_u16.to_le_bytes()); // i386
    image[0x86..0x88].copy_from_slice(&1_u16.to_le_bytes()); // sections
    image[0x94..0x96].copy_from_slice(&0x00E0_u16.to_le_bytes()); // optional header size
    image[0x96..0x98].copy_from_slice(&0x0102_u16.to_le_bytes()); // executable, 32-bit

    // Optional header (PE32).
    let opt = 0x98;
    image[opt..opt + 2].copy_from_slice(&0x010B_u16.to_le_bytes());
    image[opt + 16..opt + 20].copy_from_slice(&0_u32.to_le_bytes()); // entry point
    image[opt + 20..opt + 24].copy_from_slice(&0x2000_u32.to_le_bytes()); // base of code
    image[opt + 28..opt + 32].copy_from_slice(&0x0040_0000_u32.to_le_bytes()); // image base
    image[opt + 32..opt + 36].copy_from_slice(&0x1000_u32.to_le_bytes()); // section align
    image[opt + 36..opt + 40].copy_from_slice(&0x200_u32.to_le_bytes()); // file align
    image[opt + 40..opt + 42].copy_from_slice(&4_u16.to_le_bytes()); // os major
    image[opt + 48..opt + 50].copy_from_slice(&4_u16.to_le_bytes()); // subsystem major
    image[opt + 56..opt + 60].copy_from_slice(&0x3000_u32.to_le_bytes()); // size of image
    image[opt + 60..opt + 64].copy_from_slice(&0x200_u32.to_le_bytes()); // size of headers
    image[opt + 68..opt + 70].copy_from_slice(&3_u16.to_le_bytes()); // subsystem: console
    image[opt + 92..opt + 96].copy_from_slice(&16_u32.to_le_bytes()); // rva count

    // Data directory 14: CLR runtime header.
    let clr_dir = opt + 96 + 14 * 8;
    image[clr_dir..clr_dir + 4].copy_from_slice(&0x2000_u32.to_le_bytes());
    image[clr_dir + 4..clr_dir + 8].copy_from_slice(&72_u32.to_le_bytes());

    // Section table: .text
    let sect = opt + 0xE0;
    image[sect..sect + 5].copy_from_slice(b".text");
    image[sect + 8..sect + 12].copy_from_slice(&0x1000_u32.to_le_bytes()); // virtual size
    image[sect + 12..sect + 16].copy_from_slice(&0x2000_u32.to_le_bytes()); // virtual address
    image[sect + 16..sect + 20].copy_from_slice(&0x600_u32.to_le_bytes()); // raw size
    image[sect + 20..sect + 24].copy_from_slice(&0x200_u32.to_le_bytes()); // raw pointer
    image[sect + 36..sect + 40].copy_from_slice(&0x6000_0020_u32.to_le_bytes()); // code|exec|read

    // COR20 header at file offset 0x200, RVA 0x2000.
    let mut cor20 = Vec::with_capacity(72);
    push_u32(&mut cor20, 72);
    push_u16(&mut cor20, 2);
    push_u16(&mut cor20, 5);
    push_u32(&mut cor20, 0x2048); // metadata RVA
    push_u32(&mut cor20, metadata.len() as u32);
    push_u32(&mut cor20, cor_flags);
    push_u32(&mut cor20, 0x0600_0001); // entry point token
    cor20.resize(72, 0);

    image.extend_from_slice(&cor20);
    image.extend_from_slice(metadata);

    // Pad out the section's raw size.
    image.resize(0x200 + 0x600, 0);
    image
}

/// ILONLY | 32BITREQUIRED, the common AnyCPU-32 configuration.
pub const FLAGS_ILONLY_32BIT: u32 = 0x3;

/// 32BITREQUIRED without ILONLY, a mixed-mode image.
pub const FLAGS_MIXED_MODE: u32 = 0x2;
