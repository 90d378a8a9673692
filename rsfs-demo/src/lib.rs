//! 演示驱动：走一遍各项数据操作，再让多个读者、写者线程并发地争用几个文件。


use std::panic;
use std::sync::Arc;
use std::thread;

use derive_more::Add;
use rsfs::{Fd, OpenFlag, Rsfs};
use vfs::{Error, Resource, Result};

const TOUR_FILE: &str = "tour";

/// 并发负载的规模
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub files: usize,
    pub readers: usize,
    pub writers: usize,
    /// 每个线程打开会话的次数
    pub rounds: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Add)]
pub struct Summary {
    pub reads: usize,
    pub writes: usize,
    pub bytes_read: usize,
    pub bytes_written: usize,
    /// 写后读回不一致的次数
    pub mismatches: usize,
}

/// 依次演示 append、write、cut，返回每一步之后的文件内容
pub fn tour(fs: &Rsfs) -> Result<Vec<(&'static str, String)>> {
    let fd = fs.open(TOUR_FILE, OpenFlag::RDWR | OpenFlag::CREATE | OpenFlag::TRUNC)?;
    let steps = session(fs, fd, |fd| {
        let mut steps = Vec::new();

        fs.write(fd, b"AAAAAAAAAA")?;
        fs.seek(fd, 0)?;
        fs.append(fd, b"BBB")?;
        steps.push(("append BBB at 0", contents(fs, fd)?));

        fs.seek(fd, 0)?;
        fs.write(fd, b"BBB")?;
        steps.push(("write BBB at 0", contents(fs, fd)?));

        fs.seek(fd, 0)?;
        fs.write(fd, b"HELLO WORLD")?;
        fs.seek(fd, 5)?;
        fs.cut(fd, 6)?;
        steps.push(("cut 6 at 5", contents(fs, fd)?));

        Ok(steps)
    })?;

    fs.delete(TOUR_FILE)?;
    Ok(steps)
}

/// 建好文件后启动全部读者与写者，等它们结束并汇总
pub fn run(fs: &Arc<Rsfs>, workload: &Workload) -> Result<Summary> {
    if workload.files == 0 {
        return Err(Error::InvalidArgument("workload needs at least one file"));
    }

    let names: Arc<[String]> = (0..workload.files).map(|i| format!("file{i}")).collect();
    for name in names.iter() {
        match fs.create(name) {
            Ok(_) | Err(Error::AlreadyExists) => {}
            Err(err) => return Err(err),
        }
    }

    let writers = (0..workload.writers).map(|id| {
        let (fs, names) = (Arc::clone(fs), Arc::clone(&names));
        let rounds = workload.rounds;
        thread::spawn(move || writer(&fs, &names, id, rounds))
    });
    let readers = (0..workload.readers).map(|id| {
        let (fs, names) = (Arc::clone(fs), Arc::clone(&names));
        let rounds = workload.rounds;
        thread::spawn(move || reader(&fs, &names, id, rounds))
    });
    let workers: Vec<_> = writers.chain(readers).collect();

    workers
        .into_iter()
        .try_fold(Summary::default(), |total, worker| {
            let summary = worker
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))?;
            Ok(total + summary)
        })
}

fn writer(fs: &Rsfs, names: &[String], id: usize, rounds: usize) -> Result<Summary> {
    let mut summary = Summary::default();

    for round in 0..rounds {
        let name = &names[(id + round) % names.len()];
        let record = format!("[w{id}#{round}]");
        let fd = fs.open(name, OpenFlag::read_write())?;

        let (written, intact) = session(fs, fd, |fd| {
            // 轮流追加到末尾和覆写整个文件，文件写满后改为覆写
            let append = round % 2 == 0;
            let mut start = if append {
                fs.fstat(fd)?.size as usize
            } else {
                0
            };
            fs.seek(fd, start)?;
            let result = if append {
                fs.append(fd, record.as_bytes())
            } else {
                fs.write(fd, record.as_bytes())
            };
            let written = match result {
                Err(Error::Exhausted(Resource::DirectPointers)) => {
                    start = 0;
                    fs.seek(fd, 0)?;
                    fs.write(fd, record.as_bytes())?
                }
                result => result?,
            };

            // 读回刚写下的记录
            fs.seek(fd, start)?;
            let mut buf = vec![0; written];
            let read = fs.read(fd, &mut buf)?;
            Ok((written, read == written && buf == record.as_bytes()[..written]))
        })?;

        log::debug!("writer {id} put {written} bytes into {name}");
        summary.writes += 1;
        summary.bytes_written += written;
        if !intact {
            log::error!("writer {id} read back a different record from {name}");
            summary.mismatches += 1;
        }
    }

    Ok(summary)
}

fn reader(fs: &Rsfs, names: &[String], id: usize, rounds: usize) -> Result<Summary> {
    let mut summary = Summary::default();

    for round in 0..rounds {
        let name = &names[(id + round) % names.len()];
        let fd = fs.open(name, OpenFlag::read_only())?;
        let bytes = session(fs, fd, |fd| read_to_end(fs, fd))?.len();

        log::debug!("reader {id} got {bytes} bytes from {name}");
        summary.reads += 1;
        summary.bytes_read += bytes;
    }

    Ok(summary)
}

/// 执行会话内的操作，无论成败都关闭会话
fn session<V>(fs: &Rsfs, fd: Fd, f: impl FnOnce(Fd) -> Result<V>) -> Result<V> {
    let result = f(fd);
    fs.close(fd)?;
    result
}

/// 从游标处读到文件末尾
fn read_to_end(fs: &Rsfs, fd: Fd) -> Result<Vec<u8>> {
    let mut buffer = [0u8; 64];
    let mut bytes = Vec::new();
    loop {
        let len = fs.read(fd, &mut buffer)?;
        if len == 0 {
            break;
        }
        bytes.extend_from_slice(&buffer[..len]);
    }
    Ok(bytes)
}

/// 整个文件的内容，游标保持不动
fn contents(fs: &Rsfs, fd: Fd) -> Result<String> {
    let position = fs.tell(fd)?;
    fs.seek(fd, 0)?;
    let bytes = read_to_end(fs, fd)?;
    fs.seek(fd, position)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
