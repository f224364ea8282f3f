fn main() {
    pogo_engine::io::main();
}
