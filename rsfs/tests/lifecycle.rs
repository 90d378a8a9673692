use std::sync::Arc;
use std::thread;

use rsfs::{Geometry, NAME_MAX_LEN, OpenFlag, Rsfs};
use vfs::{Error, Resource};

fn fs_with_inodes(inodes: usize) -> Rsfs {
    Rsfs::new(Geometry {
        inodes,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn create_and_list_in_order() {
    let fs = fs_with_inodes(8);
    for name in ["c", "a", "b"] {
        fs.create(name).unwrap();
    }
    assert_eq!(fs.create("a"), Err(Error::AlreadyExists));

    let stat = fs.stat();
    let names: Vec<_> = stat.files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, ["c", "a", "b"]);
    assert_eq!(stat.inodes.used, 3);
    assert_eq!(stat.inodes.unused(), 5);
}

#[test]
fn inode_exhaustion() {
    let fs = fs_with_inodes(4);
    for i in 0..4 {
        fs.create(&format!("file{i}")).unwrap();
    }
    assert_eq!(
        fs.create("one-too-many"),
        Err(Error::Exhausted(Resource::Inodes))
    );
    // 失败的创建不留下目录项
    assert_eq!(fs.metadata("one-too-many"), Err(Error::NotFound));
    assert_eq!(fs.stat().files.len(), 4);
}

#[test]
fn bad_names() {
    let fs = fs_with_inodes(4);
    assert!(matches!(fs.create(""), Err(Error::InvalidArgument(_))));
    assert!(matches!(
        fs.create(&"n".repeat(NAME_MAX_LEN + 1)),
        Err(Error::InvalidArgument(_))
    ));
    fs.create(&"n".repeat(NAME_MAX_LEN)).unwrap();
}

#[test]
fn missing_files() {
    let fs = fs_with_inodes(4);
    assert_eq!(fs.open("ghost", OpenFlag::read_only()), Err(Error::NotFound));
    assert_eq!(fs.delete("ghost"), Err(Error::NotFound));
    assert_eq!(fs.metadata("ghost"), Err(Error::NotFound));
}

#[test]
fn delete_frees_blocks_and_name() {
    let fs = fs_with_inodes(4);
    let fd = fs.open("big", OpenFlag::RDWR | OpenFlag::CREATE).unwrap();
    let capacity = fs.geometry().file_capacity();
    fs.write(fd, &vec![0xAB; capacity]).unwrap();
    fs.close(fd).unwrap();

    let before = fs.stat();
    assert_eq!(before.blocks.used, fs.geometry().pointers);
    assert_eq!(
        fs.metadata("big").unwrap().blocks,
        fs.geometry().pointers as u64
    );

    fs.delete("big").unwrap();
    let after = fs.stat();
    assert_eq!(after.blocks.used, 0);
    assert_eq!(after.inodes.used, 0);
    assert!(after.files.is_empty());
    assert_eq!(fs.open("big", OpenFlag::read_only()), Err(Error::NotFound));

    // 重新创建得到的是干净的空文件
    let fd = fs.open("big", OpenFlag::RDWR | OpenFlag::CREATE).unwrap();
    assert_eq!(fs.fstat(fd).unwrap().size, 0);
    let mut buf = [0xff; 4];
    assert_eq!(fs.read(fd, &mut buf), Ok(0));
}

#[test]
fn delete_open_file_is_refused() {
    let fs = fs_with_inodes(4);
    let fd = fs.open("busy", OpenFlag::RDWR | OpenFlag::CREATE).unwrap();
    fs.write(fd, b"still here").unwrap();

    assert_eq!(fs.delete("busy"), Err(Error::Busy));
    assert_eq!(fs.fstat(fd).unwrap().size, 10);

    fs.close(fd).unwrap();
    fs.delete("busy").unwrap();
}

#[test]
fn racing_creates_have_one_winner() {
    let fs = Arc::new(fs_with_inodes(16));
    let results: Vec<_> = (0..8)
        .map(|_| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || fs.create("contested"))
        })
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|result| result.err())
            .all(|err| err == Error::AlreadyExists)
    );
    assert_eq!(fs.stat().inodes.used, 1);
}

#[test]
fn blocks_are_never_shared() {
    let fs = Arc::new(fs_with_inodes(8));
    let writers: Vec<_> = (0..4)
        .map(|id| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || {
                let name = format!("w{id}");
                let fd = fs.open(&name, OpenFlag::RDWR | OpenFlag::CREATE).unwrap();
                for round in 1..=fs.geometry().pointers {
                    let len = round * fs.geometry().block_size - id;
                    fs.seek(fd, 0).unwrap();
                    fs.write(fd, &vec![id as u8; len]).unwrap();
                }
                fs.close(fd).unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let stat = fs.stat();
    let capacity = fs.geometry().file_capacity() as u64;
    let mut referenced = 0;
    for file in &stat.files {
        let meta = fs.metadata(&file.name).unwrap();
        assert!(meta.size <= capacity);
        referenced += meta.blocks as usize;

        let fd = fs.open(&file.name, OpenFlag::read_only()).unwrap();
        let mut buf = vec![0; meta.size as usize];
        fs.read(fd, &mut buf).unwrap();
        let id: u8 = file.name[1..].parse().unwrap();
        assert!(buf.iter().all(|&b| b == id));
        fs.close(fd).unwrap();
    }
    assert_eq!(referenced, stat.blocks.used);
}

#[test]
fn zero_geometry_rejected() {
    assert!(matches!(
        Rsfs::new(Geometry {
            block_size: 0,
            ..Default::default()
        }),
        Err(Error::InvalidArgument(_))
    ));
}
