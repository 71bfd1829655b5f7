use std::ptr;

struct Probe(u32);

trait Erased {
    fn id(&self) -> u32;
}

impl Erased for Probe {
    fn id(&self) -> u32 {
        self.0
    }
}

fn layout_broken(what: &str) {
    panic!(
        concat!(
            "Assumptions on layout are broken, inline holders are addressed by ",
            "rewriting the data half of a trait object pointer, ",
            "now layout of {:?} is broken, report about it on github"
        ),
        what
    );
}

/// Checks that the data pointer is the first word of a trait object pointer.
fn test_dyn_layout() {
    #[repr(C)]
    struct DynObj {
        data_ptr: *const u8,
        vtable: *const u8,
    }

    let probe = Box::new(Probe(7));
    let data_ptr = Box::into_raw(probe);

    let erased: *const dyn Erased = data_ptr;
    let repr: DynObj = unsafe { ptr::read(ptr::addr_of!(erased).cast::<DynObj>()) };

    if repr.data_ptr != data_ptr.cast::<u8>().cast_const() {
        layout_broken("trait objects");
    }

    let probe = unsafe { Box::from_raw(data_ptr) };
    if probe.id() != 7 {
        layout_broken("trait object vtables");
    }
}

fn main() {
    // NOTE: this checks the host, which may differ from the target.
    test_dyn_layout();
    println!("cargo:rerun-if-changed=build.rs");
}
