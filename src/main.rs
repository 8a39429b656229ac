fn main() -> eyre::Result<()> {
    imgtools::main()
}
