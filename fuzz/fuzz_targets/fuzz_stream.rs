#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use strio::{LineRequest, SharedBuffer, StringStream, Whence};

#[derive(Arbitrary, Debug)]
enum Op {
    Write(Vec<u8>),
    Read(Option<u8>),
    Gets { sep: Option<Vec<u8>>, limit: Option<u8> },
    Getc,
    Ungetc(Vec<u8>),
    Seek { offset: i16, whence: u8 },
    Truncate(u8),
    Far(u8),
    Dup,
    Rewind,
}

#[derive(Arbitrary, Debug)]
struct Input {
    initial: Vec<u8>,
    mode: u8,
    ops: Vec<Op>,
}

const MODES: &[&str] = &["r", "r+", "rb", "w", "w+", "a", "a+", "ab+"];

fuzz_target!(|input: Input| {
    let buffer = SharedBuffer::from(input.initial);
    let mode = MODES[usize::from(input.mode) % MODES.len()];
    let Ok(mut io) = StringStream::new(buffer.clone(), mode) else {
        return;
    };
    let mut dups = Vec::new();

    for op in input.ops {
        let before = (io.pos(), io.lineno(), buffer.to_bstring());
        let failed = match op {
            Op::Write(data) => io.write(&data).is_err(),
            Op::Read(len) => io.read(len.map(usize::from)).is_err(),
            Op::Gets { sep, limit } => {
                let mut request = sep.map_or_else(LineRequest::to_end, LineRequest::separator);
                request.limit = limit.map(usize::from);
                match io.gets(request) {
                    Ok(Some(line)) => {
                        assert!(io.pos() >= before.0);
                        assert!(line.len() <= io.pos());
                        false
                    }
                    Ok(None) => {
                        assert!(io.eof() || limit == Some(0));
                        false
                    }
                    Err(_) => true,
                }
            }
            Op::Getc => io.getc().is_err(),
            Op::Ungetc(data) => io.ungetc(&data).is_err(),
            Op::Seek { offset, whence } => {
                let Ok(whence) = Whence::try_from(i32::from(whence % 4)) else {
                    continue;
                };
                io.seek(i64::from(offset), whence).is_err()
            }
            Op::Truncate(len) => io.truncate(usize::from(len)).is_err(),
            Op::Far(back) => {
                io.set_pos(usize::MAX - usize::from(back));
                false
            }
            Op::Dup => {
                dups.push(io.clone());
                false
            }
            Op::Rewind => {
                io.rewind();
                false
            }
        };

        if failed {
            assert_eq!((io.pos(), io.lineno(), buffer.to_bstring()), before);
        }
        assert_eq!(io.eof(), io.pos() >= buffer.len());
    }

    for dup in &dups {
        assert!(dup.buffer().is_some_and(|b| b.ptr_eq(&buffer)));
    }
});
