use chip8::{Chip8, PROGRAM_START};

#[allow(dead_code)]
/// Assemble opcodes into a ROM image, with extra data copied in at absolute
/// addresses (which must be past the code).
pub fn rom(program: &[u16], data: &[(u16, &[u8])]) -> Vec<u8> {
    let mut image: Vec<u8> = program
        .iter()
        .flat_map(|op| op.to_be_bytes().to_vec())
        .collect();
    for (addr, bytes) in data {
        let start = (*addr - PROGRAM_START) as usize;
        if image.len() < start + bytes.len() {
            image.resize(start + bytes.len(), 0);
        }
        image[start..start + bytes.len()].copy_from_slice(bytes);
    }
    image
}

#[allow(dead_code)]
pub fn machine(program: &[u16], data: &[(u16, &[u8])]) -> Chip8 {
    let mut chip8 = Chip8::with_seed(8);
    chip8.load(&rom(program, data)).unwrap();
    chip8
}

#[allow(dead_code)]
pub fn run(chip8: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        chip8.step().unwrap();
    }
}
