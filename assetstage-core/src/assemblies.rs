//! Assembly name rules
//!
//! Which assemblies are framework/engine references, which are implicitly
//! part of every Unity project, and which folder each one exports into.

/// Folder for ordinary script assemblies
pub const SCRIPTS_FOLDER: &str = "Scripts";

/// Folder for the legacy first-pass assembly
pub const PLUGINS_FOLDER: &str = "Plugins";

/// Assemblies Unity compiles for every project without an asmdef
const PREDEFINED_ASSEMBLIES: &[&str] = &[
    "Assembly-CSharp",
    "Assembly-CSharp-firstpass",
    "Assembly-CSharp-Editor",
    "Assembly-CSharp-Editor-firstpass",
    "Assembly-UnityScript",
    "Assembly-UnityScript-firstpass",
    "Assembly-UnityScript-Editor",
    "Assembly-UnityScript-Editor-firstpass",
    "Assembly-Boo",
    "Assembly-Boo-firstpass",
    "Assembly-Boo-Editor",
    "Assembly-Boo-Editor-firstpass",
];

const REFERENCE_ASSEMBLIES: &[&str] = &["mscorlib", "netstandard", "System", "UnityEngine", "UnityEditor"];

const REFERENCE_PREFIXES: &[&str] = &["System.", "Mono.", "Microsoft.", "UnityEngine.", "UnityEditor.", "Unity."];

/// Strip a trailing `.dll` from an assembly file name
pub fn to_assembly_name(name: &str) -> &str {
    name.strip_suffix(".dll").unwrap_or(name)
}

/// Assemblies only present for type resolution; never decompiled
pub fn is_reference_assembly(name: &str) -> bool {
    let name = to_assembly_name(name);
    REFERENCE_ASSEMBLIES.contains(&name) || REFERENCE_PREFIXES.iter().any(|p| name.starts_with(p))
}

pub fn is_predefined_assembly(name: &str) -> bool {
    PREDEFINED_ASSEMBLIES.contains(&to_assembly_name(name))
}

/// Scripts from Unity's own assemblies are never exported
pub fn is_engine_assembly(name: &str) -> bool {
    let name = to_assembly_name(name);
    name.starts_with("UnityEngine") || name.starts_with("UnityEditor")
}

/// Top-level folder under the assets directory for an assembly
pub fn scripts_folder_name(assembly_name: &str) -> &'static str {
    match assembly_name {
        "Assembly-CSharp-firstpass" | "Assembly - CSharp - firstpass" => PLUGINS_FOLDER,
        _ => SCRIPTS_FOLDER,
    }
}
