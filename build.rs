fn main() {
    // Generate C# bindings for .NET interop
    // Types are generated directly as public - no source generator layer
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");

    csbindgen::Builder::default()
        .input_extern_file("src/lib.rs")
        .input_extern_file("src/encoder.rs")
        .input_extern_file("src/error.rs")
        .input_extern_file("src/types.rs")
        .csharp_dll_name("jxl_enc_ffi")
        .csharp_namespace("JpegXL.Net")
        .csharp_class_name("EncoderNativeMethods")
        .csharp_class_accessibility("public")
        .csharp_use_nint_types(false) // Use UIntPtr/IntPtr for netstandard2.0 compatibility
        .generate_csharp_file(format!("{out_dir}/EncoderNativeMethods.g.cs"))
        .expect("Failed to generate C# bindings");

    println!("cargo:rerun-if-changed=src/");
}
